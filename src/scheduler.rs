//! Periodic peer-directory refresh, gated by rendered sink content.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::RelayClient;

/// Re-invokes the peer-list operation on a fixed cadence.
///
/// The gate is a liveness check, not a subscription: a tick fires the
/// operation only when the register region has rendered peer lines, and the
/// loop keeps no memory of previous outcomes. Each invocation is spawned
/// independently, so a slow refresh may still be in flight when the next
/// tick fires; the sink board's issue counter discards whichever completion
/// is stale. A failed refresh is never retried — the next tick is an
/// independent call.
pub struct PeerListPoller {
    client: Arc<RelayClient>,
}

impl PeerListPoller {
    pub fn new(client: Arc<RelayClient>) -> Self {
        Self { client }
    }

    /// Spawn the poll loop as a background task. Abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the poll loop indefinitely. The first tick fires one full
    /// interval after start.
    pub async fn run(self) {
        let interval = self.client.config().poll_interval;
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !self.client.sinks().has_rendered_peers() {
                continue;
            }

            debug!("poll tick: refreshing peer directory");
            let client = Arc::clone(&self.client);
            tokio::spawn(async move {
                let _ = client.get_peer_list().await;
            });
        }
    }
}
