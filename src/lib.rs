//! # peerlink
//!
//! Client for a peer-coordination and messaging relay service: registers a
//! local peer, discovers other peers, joins named channels, requests
//! peer-to-peer connections, broadcasts channel messages, fetches channel
//! history, and sends direct messages.
//!
//! ## Shape of the crate
//!
//! 1. **Transport** ([`transport`]) — one HTTP primitive shared by all
//!    operations. Returns a [`NormalizedResult`], never raises.
//! 2. **Normalization** ([`mod@normalize`]) — classifies a raw body as
//!    structured data or opaque text; transport failures become the third
//!    shape.
//! 3. **Operations** ([`client`]) — six named bindings, each assembling a
//!    typed payload and routing the result to a named sink region.
//! 4. **Sinks** ([`sink`]) — the per-region result store, with a monotonic
//!    issue counter so stale completions cannot overwrite fresh ones.
//! 5. **Polling** ([`scheduler`]) — refreshes the peer directory on a fixed
//!    cadence, gated by the directory having rendered at least once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = Arc::new(RelayClient::new(RelayConfig::new("http://localhost:8001")));
//! client.get_peer_list().await;
//! let handle = PeerListPoller::new(Arc::clone(&client)).spawn();
//! ```

pub mod cli;
pub mod client;
pub mod error;
pub mod normalize;
pub mod scheduler;
pub mod sink;
pub mod transport;
pub mod wire;

pub use client::RelayClient;
pub use error::InputError;
pub use normalize::{normalize, NormalizedResult};
pub use scheduler::PeerListPoller;
pub use sink::{RegionView, SinkBoard, SinkId, Ticket};
pub use transport::{RelayConfig, RelayTransport};
pub use wire::{
    BroadcastRequest, ChannelMessage, ConnectRequest, DirectMessageRequest, JoinChannelRequest,
    MessageQuery, PeerRecord, RegisterRequest,
};
