//! Fallback backend for targets without a supported biometric service.

use crate::{Availability, PlatformError, PlatformService};

/// A [`PlatformService`] that never has biometrics.
///
/// Used on Linux, Android (the host drives BiometricPrompt itself there)
/// and in the editor/desktop builds of a game. Availability is always
/// [`Availability::NoHardware`] and every evaluation fails with
/// [`PlatformError::NotAvailable`], so the host still gets its outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl UnsupportedPlatform {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformService for UnsupportedPlatform {
    fn availability(&self) -> Result<Availability, PlatformError> {
        Ok(Availability::NoHardware)
    }

    async fn evaluate(&self, _reason: &str) -> Result<(), PlatformError> {
        tracing::debug!("biometric evaluation requested on unsupported platform");
        Err(PlatformError::NotAvailable(
            "biometric authentication is not supported on this platform".into(),
        ))
    }
}
