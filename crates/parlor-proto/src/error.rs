//! Protocol error types.

use thiserror::Error;

/// Errors from encoding or decoding wire events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Event could not be serialized to the JSON envelope.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Text frame did not parse as a known event envelope.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
