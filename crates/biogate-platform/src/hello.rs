//! Windows Hello backend.

use windows::Security::Credentials::UI::{
    UserConsentVerificationResult, UserConsentVerifier, UserConsentVerifierAvailability,
};
use windows::core::HSTRING;

use crate::{Availability, PlatformError, PlatformService};

/// [`PlatformService`] backed by `UserConsentVerifier`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsHelloPlatform;

impl WindowsHelloPlatform {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformService for WindowsHelloPlatform {
    fn availability(&self) -> Result<Availability, PlatformError> {
        let availability = UserConsentVerifier::CheckAvailabilityAsync()
            .map_err(|e| hello_error("availability check", &e))?
            .join()
            .map_err(|e| hello_error("availability check", &e))?;

        Ok(match availability {
            UserConsentVerifierAvailability::Available => Availability::Available,
            UserConsentVerifierAvailability::DeviceNotPresent => Availability::NoHardware,
            UserConsentVerifierAvailability::NotConfiguredForUser => Availability::NotEnrolled,
            UserConsentVerifierAvailability::DisabledByPolicy => Availability::DisabledByPolicy,
            UserConsentVerifierAvailability::DeviceBusy => Availability::Busy,
            _ => Availability::Unknown,
        })
    }

    async fn evaluate(&self, reason: &str) -> Result<(), PlatformError> {
        let prompt = HSTRING::from(reason);
        let result = tokio::task::spawn_blocking(move || {
            UserConsentVerifier::RequestVerificationAsync(&prompt)
                .map_err(|e| hello_error("request", &e))?
                .join()
                .map_err(|e| hello_error("request", &e))
        })
        .await
        .map_err(|e| PlatformError::Other(format!("Hello task failed: {e}")))??;

        match result {
            UserConsentVerificationResult::Verified => Ok(()),
            UserConsentVerificationResult::Canceled => Err(PlatformError::UserCancel),
            UserConsentVerificationResult::RetriesExhausted => {
                Err(PlatformError::AuthenticationFailed)
            }
            UserConsentVerificationResult::DeviceNotPresent => Err(
                PlatformError::NotAvailable("Windows Hello device not present".into()),
            ),
            UserConsentVerificationResult::NotConfiguredForUser => {
                Err(PlatformError::NotEnrolled)
            }
            UserConsentVerificationResult::DisabledByPolicy => {
                Err(PlatformError::DisabledByPolicy)
            }
            UserConsentVerificationResult::DeviceBusy => Err(PlatformError::Busy),
            other => Err(PlatformError::Other(format!(
                "Windows Hello verification failed: {other:?}"
            ))),
        }
    }
}

fn hello_error(op: &str, e: &windows::core::Error) -> PlatformError {
    PlatformError::Other(format!("Hello {op} failed: {}", e.message()))
}
