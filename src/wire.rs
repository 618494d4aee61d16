//! Wire types for the relay's seven endpoints.
//!
//! One explicit struct per operation, carrying exactly the field set the
//! relay expects. Inputs are validated at construction: identifiers and
//! channel names must be non-empty and ports non-zero, rather than passing
//! untyped values straight onto the wire.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

fn require(field: &'static str, value: String) -> Result<String, InputError> {
    if value.is_empty() {
        Err(InputError::Empty(field))
    } else {
        Ok(value)
    }
}

// -- Request payloads --------------------------------------------------------

/// POST `/submit-info` — announce this peer to the relay.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub peer_id: String,
    pub ip: String,
    pub port: u16,
}

impl RegisterRequest {
    pub fn new(
        peer_id: impl Into<String>,
        ip: impl Into<String>,
        port: u16,
    ) -> Result<Self, InputError> {
        if port == 0 {
            return Err(InputError::ZeroPort);
        }
        Ok(Self {
            peer_id: require("peer_id", peer_id.into())?,
            ip: require("ip", ip.into())?,
            port,
        })
    }
}

/// POST `/add-list` — join a named channel.
#[derive(Debug, Clone, Serialize)]
pub struct JoinChannelRequest {
    pub peer_id: String,
    pub channel: String,
}

impl JoinChannelRequest {
    pub fn new(peer_id: impl Into<String>, channel: impl Into<String>) -> Result<Self, InputError> {
        Ok(Self {
            peer_id: require("peer_id", peer_id.into())?,
            channel: require("channel", channel.into())?,
        })
    }
}

/// POST `/connect-peer` — request a peer-to-peer connection.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectRequest {
    pub from_peer: String,
    pub to_peer: String,
}

impl ConnectRequest {
    pub fn new(from_peer: impl Into<String>, to_peer: impl Into<String>) -> Result<Self, InputError> {
        Ok(Self {
            from_peer: require("from_peer", from_peer.into())?,
            to_peer: require("to_peer", to_peer.into())?,
        })
    }
}

/// POST `/broadcast-peer` — send a message to every member of a channel.
/// The message text itself may be empty; the relay accepts it.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastRequest {
    pub peer_id: String,
    pub channel: String,
    pub message: String,
}

impl BroadcastRequest {
    pub fn new(
        peer_id: impl Into<String>,
        channel: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            peer_id: require("peer_id", peer_id.into())?,
            channel: require("channel", channel.into())?,
            message: message.into(),
        })
    }
}

/// GET `/get-messages` — fetch channel history. The channel is typed here
/// but never reaches the wire: the transport drops payloads on GET.
#[derive(Debug, Clone, Serialize)]
pub struct MessageQuery {
    pub channel: String,
}

impl MessageQuery {
    pub fn new(channel: impl Into<String>) -> Result<Self, InputError> {
        Ok(Self {
            channel: require("channel", channel.into())?,
        })
    }
}

/// POST `/send-peer` — direct message to one peer.
#[derive(Debug, Clone, Serialize)]
pub struct DirectMessageRequest {
    pub from_peer: String,
    pub to_peer: String,
    pub message: String,
}

impl DirectMessageRequest {
    pub fn new(
        from_peer: impl Into<String>,
        to_peer: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            from_peer: require("from_peer", from_peer.into())?,
            to_peer: require("to_peer", to_peer.into())?,
            message: message.into(),
        })
    }
}

// -- Response records ----------------------------------------------------------

/// One peer as listed by `/get-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    pub peer_id: String,
    pub ip: String,
    pub port: u16,
}

impl PeerRecord {
    /// Console line for the peer directory, e.g. `p2 - 10.0.0.2:6000`.
    pub fn render_line(&self) -> String {
        format!("{} - {}:{}", self.peer_id, self.ip, self.port)
    }
}

/// One channel message as listed by `/get-messages`. Ordering is whatever
/// the relay returns; the client does not sort or dedupe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub from: String,
    pub message: String,
    pub timestamp: String,
}

impl ChannelMessage {
    /// Console line for channel history, e.g. `p1: hi (t1)`.
    pub fn render_line(&self) -> String {
        format!("{}: {} ({})", self.from, self.message, self.timestamp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
