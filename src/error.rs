//! Input validation errors raised when assembling operation requests.
//!
//! These never cross the transport boundary — transport and decode failures
//! are absorbed into [`NormalizedResult`](crate::normalize::NormalizedResult).
//! This enum only covers caller input rejected before a request is issued.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A required identifier or channel name was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
    /// Port 0 cannot identify a reachable peer.
    #[error("port must be non-zero")]
    ZeroPort,
}
