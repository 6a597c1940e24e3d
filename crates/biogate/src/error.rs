//! Unified error type for the Biogate bridge.

use biogate_protocol::ProtocolError;

/// Errors raised by the bridge itself.
///
/// Platform and request failures never show up here: the core has already
/// turned them into outcomes. Nothing of this type crosses the C boundary;
/// entry points turn it into a `false` or a log line.
#[derive(Debug, thiserror::Error)]
pub enum BiogateError {
    /// Encoding or routing an outcome failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The JSON passed to `ConfigureBiometricBridge` was rejected.
    #[error("invalid bridge configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// The bridge's Tokio runtime could not be built.
    #[error("failed to start bridge runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Configuration arrived after the bridge was already in use.
    #[error("bridge already started; configure it before the first call")]
    AlreadyStarted,
}
