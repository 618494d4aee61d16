//! The six relay operations, each a thin binding over the shared transport.
//!
//! Every operation follows the same path: issue a sink ticket, send the
//! request, apply the normalized result to the ticket's region, and return
//! the result to the caller. Divergent per-operation error handling is
//! exactly what this layer exists to prevent.

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;

use crate::normalize::NormalizedResult;
use crate::sink::{SinkBoard, SinkId};
use crate::transport::{RelayConfig, RelayTransport};
use crate::wire::{
    BroadcastRequest, ConnectRequest, DirectMessageRequest, JoinChannelRequest, MessageQuery,
    RegisterRequest,
};

/// Client for the peer-coordination relay. Cheap to share behind an [`Arc`];
/// the poller and user-triggered calls use the same instance and the same
/// sink board.
pub struct RelayClient {
    transport: RelayTransport,
    config: RelayConfig,
    sinks: Arc<SinkBoard>,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Self {
        let transport = RelayTransport::new(&config);
        Self {
            transport,
            config,
            sinks: Arc::new(SinkBoard::new()),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn sinks(&self) -> &Arc<SinkBoard> {
        &self.sinks
    }

    async fn dispatch(
        &self,
        sink: SinkId,
        endpoint: &str,
        method: Method,
        payload: Option<serde_json::Value>,
    ) -> NormalizedResult {
        // Ticket before send: staleness is judged by issue order.
        let ticket = self.sinks.issue(sink);
        let result = self.transport.send(endpoint, method, payload.as_ref()).await;
        self.sinks.apply(ticket, result.clone());
        result
    }

    /// POST `/submit-info` — announce this peer to the relay.
    pub async fn register_peer(&self, request: &RegisterRequest) -> NormalizedResult {
        self.dispatch(
            SinkId::Register,
            "/submit-info",
            Method::POST,
            Some(json!(request)),
        )
        .await
    }

    /// GET `/get-list` — fetch the peer directory. When the reply carries a
    /// `peers` sequence, the register region's rendered lines are refreshed
    /// as well.
    pub async fn get_peer_list(&self) -> NormalizedResult {
        self.dispatch(SinkId::Register, "/get-list", Method::GET, None)
            .await
    }

    /// POST `/add-list` — join a named channel.
    pub async fn join_channel(&self, request: &JoinChannelRequest) -> NormalizedResult {
        self.dispatch(
            SinkId::Channel,
            "/add-list",
            Method::POST,
            Some(json!(request)),
        )
        .await
    }

    /// POST `/connect-peer` — request a peer-to-peer connection.
    pub async fn connect_peer(&self, request: &ConnectRequest) -> NormalizedResult {
        self.dispatch(
            SinkId::Connect,
            "/connect-peer",
            Method::POST,
            Some(json!(request)),
        )
        .await
    }

    /// POST `/broadcast-peer` — broadcast a message to a channel.
    pub async fn broadcast_message(&self, request: &BroadcastRequest) -> NormalizedResult {
        self.dispatch(
            SinkId::Broadcast,
            "/broadcast-peer",
            Method::POST,
            Some(json!(request)),
        )
        .await
    }

    /// GET `/get-messages` — fetch channel history. The query is typed but
    /// travels nowhere: the transport drops payloads on GET. When the reply
    /// carries a `messages` sequence, the broadcast region's rendered lines
    /// are refreshed as well.
    pub async fn get_messages(&self, query: &MessageQuery) -> NormalizedResult {
        self.dispatch(
            SinkId::Broadcast,
            "/get-messages",
            Method::GET,
            Some(json!(query)),
        )
        .await
    }

    /// POST `/send-peer` — send a direct message to one peer.
    pub async fn send_direct_message(&self, request: &DirectMessageRequest) -> NormalizedResult {
        self.dispatch(
            SinkId::DirectMessage,
            "/send-peer",
            Method::POST,
            Some(json!(request)),
        )
        .await
    }
}
