//! Error types for the platform layer.

use crate::Availability;

/// Why the OS biometric service did not authenticate the user.
///
/// The variants follow the union of what LocalAuthentication and Windows
/// Hello report. Backends translate their native codes into these; the
/// core then folds them into the five host-visible outcome kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The user dismissed the prompt.
    #[error("user cancelled the prompt")]
    UserCancel,

    /// The user picked the fallback button (e.g. "Enter Password").
    #[error("user chose the fallback option")]
    UserFallback,

    /// The OS dismissed the prompt (app moved to background, another
    /// prompt took over, ...).
    #[error("prompt cancelled by the system")]
    SystemCancel,

    /// The biometric did not match after the OS's own retries.
    #[error("biometric did not match")]
    AuthenticationFailed,

    /// Biometric hardware is missing or went away.
    #[error("biometrics not available: {0}")]
    NotAvailable(String),

    /// No biometric is enrolled.
    #[error("no biometrics enrolled")]
    NotEnrolled,

    /// Too many failed attempts.
    #[error("biometrics locked out")]
    LockedOut,

    /// The device has no passcode, which biometrics require.
    #[error("device passcode is not set")]
    PasscodeNotSet,

    /// Disabled by MDM / group policy.
    #[error("biometrics disabled by policy")]
    DisabledByPolicy,

    /// The sensor is in use.
    #[error("biometric device busy")]
    Busy,

    /// Anything the backend could not classify.
    #[error("platform error: {0}")]
    Other(String),
}

impl PlatformError {
    /// The error a backend reports when asked to evaluate while the device
    /// is in the given (non-usable) state.
    pub fn from_availability(availability: Availability) -> Self {
        match availability {
            Availability::NotEnrolled => Self::NotEnrolled,
            Availability::LockedOut => Self::LockedOut,
            Availability::DisabledByPolicy => Self::DisabledByPolicy,
            Availability::Busy => Self::Busy,
            Availability::Available
            | Availability::NoHardware
            | Availability::Unknown => Self::NotAvailable(availability.to_string()),
        }
    }
}
