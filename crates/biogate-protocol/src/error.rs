//! Error types for the protocol layer.

/// Errors that can occur while encoding or routing an outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outcome to JSON failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Parsing an outcome from JSON failed.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A numeric outcome code outside `0..=4`.
    #[error("unknown outcome code: {0}")]
    UnknownCode(i32),
}
