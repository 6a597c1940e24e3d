//! Platform biometric service abstraction for Biogate.
//!
//! The biometric sensor is a process-wide resource owned by the operating
//! system. Biogate never talks to it directly: everything goes through the
//! [`PlatformService`] trait, a capability the core is handed at
//! construction time. Production code uses [`SystemPlatform`]; tests
//! substitute a scripted fake.
//!
//! # Backends
//!
//! | target | type | OS service |
//! |---|---|---|
//! | `target_vendor = "apple"` | `LocalAuthPlatform` | LocalAuthentication (`LAContext`) |
//! | `target_os = "windows"` | `WindowsHelloPlatform` | `UserConsentVerifier` |
//! | anything else | [`UnsupportedPlatform`] | none, always unavailable |

#![allow(async_fn_in_trait)]

mod error;
mod unsupported;

#[cfg(target_vendor = "apple")]
mod apple;
#[cfg(target_os = "windows")]
mod hello;

pub use error::PlatformError;
pub use unsupported::UnsupportedPlatform;

#[cfg(target_vendor = "apple")]
pub use apple::LocalAuthPlatform;
#[cfg(target_os = "windows")]
pub use hello::WindowsHelloPlatform;

use std::fmt;

/// The backend for the current compilation target.
#[cfg(target_vendor = "apple")]
pub type SystemPlatform = LocalAuthPlatform;

/// The backend for the current compilation target.
#[cfg(target_os = "windows")]
pub type SystemPlatform = WindowsHelloPlatform;

/// The backend for the current compilation target.
#[cfg(not(any(target_vendor = "apple", target_os = "windows")))]
pub type SystemPlatform = UnsupportedPlatform;

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Point-in-time state of the biometric hardware as reported by the OS.
///
/// Only [`Availability::Available`] means a challenge could be presented
/// right now. Every other variant says why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    /// Hardware present, at least one biometric enrolled, not locked out.
    Available,
    /// No biometric hardware (or no OS support for it).
    NoHardware,
    /// Hardware present but nothing enrolled.
    NotEnrolled,
    /// Too many failed attempts; the OS requires the passcode first.
    LockedOut,
    /// Administratively disabled (MDM, group policy, passcode not set).
    DisabledByPolicy,
    /// The sensor is currently in use by someone else.
    Busy,
    /// The OS reported a state this crate doesn't know about.
    Unknown,
}

impl Availability {
    /// Returns `true` if a biometric challenge could be presented now.
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Available => "available",
            Self::NoHardware => "no biometric hardware",
            Self::NotEnrolled => "no biometrics enrolled",
            Self::LockedOut => "biometrics locked out",
            Self::DisabledByPolicy => "biometrics disabled by policy",
            Self::Busy => "biometric device busy",
            Self::Unknown => "unknown biometric state",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// PlatformService
// ---------------------------------------------------------------------------

/// Access to the OS-owned biometric authentication service.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one instance is shared by the gate and every
///   in-flight request task, which may run on any runtime thread.
///
/// Implementations must not present any UI from [`availability`]
/// and must present exactly one OS prompt per [`evaluate`] call. Retries
/// inside the prompt are the OS's business; `evaluate` resolves once the
/// prompt is gone.
///
/// [`availability`]: PlatformService::availability
/// [`evaluate`]: PlatformService::evaluate
pub trait PlatformService: Send + Sync + 'static {
    /// Reports whether a biometric challenge could be presented right now.
    ///
    /// Must be cheap, synchronous, and side-effect free.
    ///
    /// # Errors
    /// Returns a [`PlatformError`] only when the query itself failed
    /// (the OS call errored out). A device that is merely not ready is
    /// an `Ok` with a non-usable [`Availability`].
    fn availability(&self) -> Result<Availability, PlatformError>;

    /// Presents the OS biometric prompt showing `reason` and waits for the
    /// user to finish with it.
    ///
    /// # Returns
    /// - `Ok(())`: the user was positively authenticated
    /// - `Err(PlatformError)`: anything else (cancel, mismatch, lockout, ...)
    fn evaluate(
        &self,
        reason: &str,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;
}
