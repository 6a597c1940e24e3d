//! Error types for the core layer.

use biogate_platform::PlatformError;
use biogate_protocol::OutcomeKind;

/// Why a request did not end in `Success`.
///
/// These never reach the host as errors. Every one is folded into an
/// outcome via [`GateError::outcome_kind`] and its `Display` text.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The platform service reported a failure.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Another request is outstanding and the overlap policy is `Reject`.
    #[error("another authentication request is in progress")]
    Busy,

    /// The evaluation task panicked or was cancelled.
    #[error("authentication task failed: {0}")]
    TaskFailed(String),

    /// The request was dropped before producing an outcome
    /// (runtime shut down, host tore the bridge down mid-prompt).
    #[error("request abandoned before completion")]
    Abandoned,
}

impl GateError {
    /// The outcome kind the host sees for this error.
    ///
    /// | error | kind |
    /// |---|---|
    /// | user cancel / fallback | `UserCancel` |
    /// | no match | `AuthenticationFailed` |
    /// | no hardware / not enrolled / locked out | `Unavailable` |
    /// | everything else | `SystemError` |
    pub fn outcome_kind(&self) -> OutcomeKind {
        match self {
            Self::Platform(err) => match err {
                PlatformError::UserCancel | PlatformError::UserFallback => {
                    OutcomeKind::UserCancel
                }
                PlatformError::AuthenticationFailed => OutcomeKind::AuthenticationFailed,
                PlatformError::NotAvailable(_)
                | PlatformError::NotEnrolled
                | PlatformError::LockedOut => OutcomeKind::Unavailable,
                PlatformError::SystemCancel
                | PlatformError::PasscodeNotSet
                | PlatformError::DisabledByPolicy
                | PlatformError::Busy
                | PlatformError::Other(_) => OutcomeKind::SystemError,
            },
            Self::Busy | Self::TaskFailed(_) | Self::Abandoned => OutcomeKind::SystemError,
        }
    }
}
