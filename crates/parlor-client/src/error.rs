//! Client error types.
//!
//! Expected, caller-recoverable failures are `Result`s. Invariant
//! violations that the original design surfaced at runtime (an action
//! dispatched without its payload) are unrepresentable here: every
//! [`crate::Action`] variant carries a typed payload.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors from protocol adapter and connection manager operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Operation attempted without an open transport. Retry after
    /// reconnecting; the core never reconnects on its own.
    #[error("socket not connected")]
    NotConnected,

    /// An intent-specific precondition failed. Caller-fixable; never
    /// retried automatically.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Which precondition failed.
        reason: String,
    },

    /// An inbound event was missing mandatory fields. The event is dropped
    /// and the connection stays open.
    #[error("protocol violation in `{event}` event: {reason}")]
    ProtocolViolation {
        /// Wire name of the offending event.
        event: &'static str,
        /// Which field or rule was violated.
        reason: String,
    },

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
