//! Per-region result store shared by user-triggered calls and the poller.
//!
//! Each region carries a monotonic issue counter. A call takes a
//! [`Ticket`] when it starts and presents it when it completes; only the
//! result of the most recently issued call for that region is applied, so a
//! slower-but-earlier call can no longer overwrite a faster-but-later one.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::normalize::NormalizedResult;
use crate::wire::{ChannelMessage, PeerRecord};

// ---------------------------------------------------------------------------
// SinkId
// ---------------------------------------------------------------------------

/// Named sink regions, one per operation response area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SinkId {
    /// Registration acks and the peer directory (shared by both operations).
    Register,
    /// Channel join acks.
    Channel,
    /// Peer-to-peer connection acks.
    Connect,
    /// Broadcast acks and channel history (shared by both operations).
    Broadcast,
    /// Direct-message acks.
    DirectMessage,
}

impl std::fmt::Display for SinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkId::Register => write!(f, "register"),
            SinkId::Channel => write!(f, "channel"),
            SinkId::Connect => write!(f, "connect"),
            SinkId::Broadcast => write!(f, "broadcast"),
            SinkId::DirectMessage => write!(f, "dm"),
        }
    }
}

// ---------------------------------------------------------------------------
// Regions and tickets
// ---------------------------------------------------------------------------

/// Ticket tying an in-flight call to the issue counter of its region.
#[derive(Debug, Clone, Copy)]
pub struct Ticket {
    sink: SinkId,
    seq: u64,
}

#[derive(Debug, Default)]
struct Region {
    issued: u64,
    result: Option<NormalizedResult>,
    error: bool,
    /// `None` until a renderable sequence has arrived; `Some(vec![])` means
    /// the sequence rendered but was empty. The distinction feeds the poll
    /// gate: an empty directory still counts as rendered content.
    lines: Option<Vec<String>>,
}

/// Read-only snapshot of one region, returned to callers by value.
#[derive(Debug, Clone, Default)]
pub struct RegionView {
    /// The most recently applied result, if any call has completed.
    pub result: Option<NormalizedResult>,
    /// Whether that result was in error state when applied.
    pub error: bool,
    /// Secondary rendered lines (peer directory or channel history). These
    /// persist across results that carry no renderable sequence.
    pub lines: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// SinkBoard
// ---------------------------------------------------------------------------

/// The shared mutable view state of the client. Interior mutability behind a
/// single mutex; critical sections are a handful of field writes.
#[derive(Debug, Default)]
pub struct SinkBoard {
    regions: Mutex<BTreeMap<SinkId, Region>>,
}

impl SinkBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SinkId, Region>> {
        self.regions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the next sequence number for `sink`. Call this before issuing
    /// the request so the counter reflects issue order, not completion order.
    pub fn issue(&self, sink: SinkId) -> Ticket {
        let mut regions = self.lock();
        let region = regions.entry(sink).or_default();
        region.issued += 1;
        Ticket {
            sink,
            seq: region.issued,
        }
    }

    /// Record `result` in the ticket's region. Returns `false` and leaves
    /// the region untouched when a newer call has been issued since — the
    /// stale completion is discarded.
    pub fn apply(&self, ticket: Ticket, result: NormalizedResult) -> bool {
        let mut regions = self.lock();
        let region = regions.entry(ticket.sink).or_default();
        if ticket.seq != region.issued {
            debug!(
                sink = %ticket.sink,
                seq = ticket.seq,
                issued = region.issued,
                "stale result discarded"
            );
            return false;
        }

        region.error = result.is_error();

        // Secondary rendering. Only two regions have a renderable sequence,
        // and opaque/errored results have no fields, so this is naturally
        // skipped for them. When the field is absent the previous lines are
        // retained; the poll gate depends on that.
        match ticket.sink {
            SinkId::Register => {
                if let Some(peers) = decode_seq::<PeerRecord>(result.field("peers")) {
                    region.lines = Some(peers.iter().map(PeerRecord::render_line).collect());
                }
            }
            SinkId::Broadcast => {
                if let Some(messages) = decode_seq::<ChannelMessage>(result.field("messages")) {
                    region.lines =
                        Some(messages.iter().map(ChannelMessage::render_line).collect());
                }
            }
            _ => {}
        }

        region.result = Some(result);
        true
    }

    /// Snapshot one region.
    pub fn view(&self, sink: SinkId) -> RegionView {
        let regions = self.lock();
        regions
            .get(&sink)
            .map(|region| RegionView {
                result: region.result.clone(),
                error: region.error,
                lines: region.lines.clone(),
            })
            .unwrap_or_default()
    }

    /// Liveness gate for the poll loop: true once the peer directory has
    /// rendered at least once, even when it rendered empty.
    pub fn has_rendered_peers(&self) -> bool {
        self.lock()
            .get(&SinkId::Register)
            .map(|region| region.lines.is_some())
            .unwrap_or(false)
    }
}

fn decode_seq<T: serde::de::DeserializeOwned>(value: Option<&serde_json::Value>) -> Option<Vec<T>> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, NormalizedResult};
    use serde_json::json;

    fn structured(value: serde_json::Value) -> NormalizedResult {
        NormalizedResult::Structured(value)
    }

    // -- apply / view ---------------------------------------------------------

    #[test]
    fn apply_records_result_and_error_flag() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Connect);
        assert!(board.apply(ticket, structured(json!({"status": "success"}))));

        let view = board.view(SinkId::Connect);
        assert_eq!(view.result, Some(structured(json!({"status": "success"}))));
        assert!(!view.error);
    }

    #[test]
    fn apply_flags_errored_result() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Register);
        board.apply(ticket, NormalizedResult::errored("connection refused"));

        let view = board.view(SinkId::Register);
        assert!(view.error);
    }

    #[test]
    fn apply_flags_truthy_structured_error_field() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Channel);
        board.apply(ticket, structured(json!({"error": "unknown peer"})));
        assert!(board.view(SinkId::Channel).error);
    }

    #[test]
    fn opaque_result_is_recorded_unflagged() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::DirectMessage);
        board.apply(ticket, normalize("Internal Server Error"));

        let view = board.view(SinkId::DirectMessage);
        assert!(!view.error);
        assert_eq!(
            view.result,
            Some(NormalizedResult::Opaque {
                raw: "Internal Server Error".to_string()
            })
        );
    }

    #[test]
    fn empty_region_views_as_default() {
        let board = SinkBoard::new();
        let view = board.view(SinkId::Broadcast);
        assert!(view.result.is_none());
        assert!(!view.error);
        assert!(view.lines.is_none());
    }

    // -- staleness guard ------------------------------------------------------

    #[test]
    fn stale_completion_is_discarded() {
        let board = SinkBoard::new();
        let early = board.issue(SinkId::Register);
        let late = board.issue(SinkId::Register);

        assert!(board.apply(late, structured(json!({"round": 2}))));
        assert!(!board.apply(early, structured(json!({"round": 1}))));

        let view = board.view(SinkId::Register);
        assert_eq!(view.result, Some(structured(json!({"round": 2}))));
    }

    #[test]
    fn stale_completion_leaves_region_untouched() {
        let board = SinkBoard::new();
        let early = board.issue(SinkId::Register);
        let late = board.issue(SinkId::Register);

        board.apply(
            late,
            structured(json!({"peers": [{"peer_id": "p2", "ip": "10.0.0.2", "port": 6000}]})),
        );
        board.apply(early, NormalizedResult::errored("slow network"));

        let view = board.view(SinkId::Register);
        assert!(!view.error);
        assert_eq!(view.lines, Some(vec!["p2 - 10.0.0.2:6000".to_string()]));
    }

    #[test]
    fn counters_are_independent_per_region() {
        let board = SinkBoard::new();
        let register = board.issue(SinkId::Register);
        let _broadcast_newer = board.issue(SinkId::Broadcast);

        // Activity on another region must not stale this ticket.
        assert!(board.apply(register, structured(json!({"ok": true}))));
    }

    // -- secondary rendering ----------------------------------------------------

    #[test]
    fn peers_sequence_renders_lines() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Register);
        board.apply(
            ticket,
            structured(json!({
                "peers": [
                    {"peer_id": "p2", "ip": "10.0.0.2", "port": 6000},
                    {"peer_id": "p3", "ip": "10.0.0.3", "port": 7000},
                ]
            })),
        );

        let view = board.view(SinkId::Register);
        assert_eq!(
            view.lines,
            Some(vec![
                "p2 - 10.0.0.2:6000".to_string(),
                "p3 - 10.0.0.3:7000".to_string(),
            ])
        );
    }

    #[test]
    fn messages_sequence_renders_lines() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Broadcast);
        board.apply(
            ticket,
            structured(json!({
                "messages": [{"from": "p1", "message": "hi", "timestamp": "t1"}]
            })),
        );

        assert_eq!(
            board.view(SinkId::Broadcast).lines,
            Some(vec!["p1: hi (t1)".to_string()])
        );
    }

    #[test]
    fn opaque_result_never_triggers_rendering() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Register);
        board.apply(ticket, normalize(r#"peers: ["p2"]"#));
        assert!(board.view(SinkId::Register).lines.is_none());
    }

    #[test]
    fn lines_persist_across_results_without_sequence() {
        let board = SinkBoard::new();
        let first = board.issue(SinkId::Register);
        board.apply(
            first,
            structured(json!({"peers": [{"peer_id": "p2", "ip": "10.0.0.2", "port": 6000}]})),
        );

        // A registration ack carries no peers field; the directory stays up.
        let second = board.issue(SinkId::Register);
        board.apply(second, structured(json!({"status": "success"})));

        assert_eq!(
            board.view(SinkId::Register).lines,
            Some(vec!["p2 - 10.0.0.2:6000".to_string()])
        );
    }

    #[test]
    fn malformed_peer_entries_skip_rendering() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Register);
        board.apply(ticket, structured(json!({"peers": [{"peer_id": "p2"}]})));
        assert!(board.view(SinkId::Register).lines.is_none());
    }

    #[test]
    fn peers_on_broadcast_region_do_not_render() {
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Broadcast);
        board.apply(
            ticket,
            structured(json!({"peers": [{"peer_id": "p2", "ip": "10.0.0.2", "port": 6000}]})),
        );
        assert!(board.view(SinkId::Broadcast).lines.is_none());
    }

    // -- poll gate ---------------------------------------------------------------

    #[test]
    fn gate_closed_until_peers_render() {
        let board = SinkBoard::new();
        assert!(!board.has_rendered_peers());

        let ticket = board.issue(SinkId::Register);
        board.apply(ticket, structured(json!({"status": "success"})));
        assert!(!board.has_rendered_peers());

        let ticket = board.issue(SinkId::Register);
        board.apply(
            ticket,
            structured(json!({"peers": [{"peer_id": "p2", "ip": "10.0.0.2", "port": 6000}]})),
        );
        assert!(board.has_rendered_peers());
    }

    #[test]
    fn empty_directory_still_opens_gate() {
        // Zero peers is still a rendered directory; polling keeps refreshing.
        let board = SinkBoard::new();
        let ticket = board.issue(SinkId::Register);
        board.apply(ticket, structured(json!({"peers": []})));
        assert!(board.has_rendered_peers());
        assert_eq!(board.view(SinkId::Register).lines, Some(vec![]));
    }

    #[test]
    fn errored_result_keeps_gate_open() {
        let board = SinkBoard::new();
        let first = board.issue(SinkId::Register);
        board.apply(
            first,
            structured(json!({"peers": [{"peer_id": "p2", "ip": "10.0.0.2", "port": 6000}]})),
        );

        let second = board.issue(SinkId::Register);
        board.apply(second, NormalizedResult::errored("connection refused"));
        assert!(board.has_rendered_peers());
    }

    // -- display names --------------------------------------------------------------

    #[test]
    fn sink_id_display_names() {
        assert_eq!(SinkId::Register.to_string(), "register");
        assert_eq!(SinkId::DirectMessage.to_string(), "dm");
    }
}
