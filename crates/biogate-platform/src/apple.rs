//! LocalAuthentication backend (Touch ID / Face ID / Optic ID).

use std::sync::Mutex;

use block2::RcBlock;
use objc2::runtime::Bool;
use objc2_foundation::{NSError, NSString};
use objc2_local_authentication::{LAContext, LAPolicy};
use tokio::sync::oneshot;

use crate::{Availability, PlatformError, PlatformService};

// LAError codes from <LocalAuthentication/LAError.h>.
const LA_AUTHENTICATION_FAILED: isize = -1;
const LA_USER_CANCEL: isize = -2;
const LA_USER_FALLBACK: isize = -3;
const LA_SYSTEM_CANCEL: isize = -4;
const LA_PASSCODE_NOT_SET: isize = -5;
const LA_BIOMETRY_NOT_AVAILABLE: isize = -6;
const LA_BIOMETRY_NOT_ENROLLED: isize = -7;
const LA_BIOMETRY_LOCKOUT: isize = -8;
const LA_APP_CANCEL: isize = -9;
const LA_BIOMETRY_NOT_PAIRED: isize = -12;
const LA_BIOMETRY_DISCONNECTED: isize = -13;

const POLICY: LAPolicy = LAPolicy::DeviceOwnerAuthenticationWithBiometrics;

/// [`PlatformService`] backed by `LAContext` with the
/// `DeviceOwnerAuthenticationWithBiometrics` policy.
///
/// A fresh context is created per call. Contexts remember a successful
/// evaluation for a while, and reusing one would let a second request
/// succeed without a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAuthPlatform;

impl LocalAuthPlatform {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformService for LocalAuthPlatform {
    fn availability(&self) -> Result<Availability, PlatformError> {
        // SAFETY: `LAContext` has no preconditions for construction or for
        // `canEvaluatePolicy:error:`, which never presents UI.
        let context = unsafe { LAContext::new() };
        match unsafe { context.canEvaluatePolicy_error(POLICY) } {
            Ok(()) => Ok(Availability::Available),
            Err(error) => {
                let code = error.code();
                tracing::debug!(code, "canEvaluatePolicy refused");
                Ok(availability_from_code(code))
            }
        }
    }

    async fn evaluate(&self, reason: &str) -> Result<(), PlatformError> {
        let reason = reason.to_owned();
        // The context must outlive the reply, and `Retained<LAContext>` is
        // not `Send`, so the whole evaluation lives on a blocking thread.
        tokio::task::spawn_blocking(move || evaluate_blocking(&reason))
            .await
            .map_err(|e| PlatformError::Other(format!("evaluation task failed: {e}")))?
    }
}

fn evaluate_blocking(reason: &str) -> Result<(), PlatformError> {
    // SAFETY: see `availability`.
    let context = unsafe { LAContext::new() };
    let (tx, rx) = oneshot::channel::<Result<(), PlatformError>>();
    // The reply block is `Fn`, but LocalAuthentication calls it once.
    let tx = Mutex::new(Some(tx));

    let reply = RcBlock::new(move |success: Bool, error: *mut NSError| {
        let result = if success.as_bool() {
            Ok(())
        } else {
            // SAFETY: the reply receives either NULL or a valid NSError
            // that stays alive for the duration of the block.
            match unsafe { error.as_ref() } {
                Some(error) => Err(error_from_code(error.code(), error)),
                None => Err(PlatformError::Other(
                    "evaluation failed without an error".into(),
                )),
            }
        };
        if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = tx.send(result);
        }
    });

    let reason = NSString::from_str(reason);
    // SAFETY: `reason` and `reply` are retained by LocalAuthentication for
    // the duration of the evaluation; `context` outlives it because we
    // block on the reply below.
    unsafe { context.evaluatePolicy_localizedReason_reply(POLICY, &reason, &reply) };

    rx.blocking_recv().map_err(|_| {
        PlatformError::Other("LocalAuthentication dropped the reply".into())
    })?
}

fn availability_from_code(code: isize) -> Availability {
    match code {
        LA_BIOMETRY_NOT_AVAILABLE
        | LA_BIOMETRY_NOT_PAIRED
        | LA_BIOMETRY_DISCONNECTED => Availability::NoHardware,
        LA_BIOMETRY_NOT_ENROLLED => Availability::NotEnrolled,
        LA_BIOMETRY_LOCKOUT => Availability::LockedOut,
        LA_PASSCODE_NOT_SET => Availability::DisabledByPolicy,
        _ => Availability::Unknown,
    }
}

fn error_from_code(code: isize, error: &NSError) -> PlatformError {
    match code {
        LA_AUTHENTICATION_FAILED => PlatformError::AuthenticationFailed,
        LA_USER_CANCEL => PlatformError::UserCancel,
        LA_USER_FALLBACK => PlatformError::UserFallback,
        LA_SYSTEM_CANCEL | LA_APP_CANCEL => PlatformError::SystemCancel,
        LA_PASSCODE_NOT_SET => PlatformError::PasscodeNotSet,
        LA_BIOMETRY_NOT_ENROLLED => PlatformError::NotEnrolled,
        LA_BIOMETRY_LOCKOUT => PlatformError::LockedOut,
        LA_BIOMETRY_NOT_AVAILABLE
        | LA_BIOMETRY_NOT_PAIRED
        | LA_BIOMETRY_DISCONNECTED => PlatformError::NotAvailable(
            error.localizedDescription().to_string(),
        ),
        _ => PlatformError::Other(format!(
            "LAError {code}: {}",
            error.localizedDescription()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_from_code_not_enrolled() {
        assert_eq!(
            availability_from_code(LA_BIOMETRY_NOT_ENROLLED),
            Availability::NotEnrolled
        );
    }

    #[test]
    fn test_availability_from_code_unknown_code() {
        assert_eq!(availability_from_code(-9999), Availability::Unknown);
    }
}
