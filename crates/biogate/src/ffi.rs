//! The C ABI.
//!
//! Every entry point is safe to call from any thread, at any time, and
//! never unwinds into the host: panics are caught at the boundary and
//! logged. The declarations mirror `include/biogate.h`.
//!
//! | Function                          | Returns                           |
//! |-----------------------------------|-----------------------------------|
//! | `IsBiometricAvailable`            | `true` if a prompt can be shown   |
//! | `AuthenticateBiometric`           | immediately; outcome via handlers |
//! | `RegisterBiometricCallback`       |                                   |
//! | `RegisterBiometricMessageHandler` |                                   |
//! | `ConfigureBiometricBridge`        | `false` if rejected               |
//! | `BiometricOutcomeKindName`        | static string, never NULL         |

#![allow(non_snake_case)]

use std::ffi::{CStr, c_char, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};

use biogate_protocol::{AuthOutcome, OutcomeKind, RequestId};

use crate::global;
use crate::{BiometricCallback, BiometricMessageHandler};

/// Request id reported when the bridge could not accept a request at all.
pub const NO_REQUEST: RequestId = RequestId(0);

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Whether biometric authentication can be attempted right now.
///
/// Never shows UI. Starts the bridge on first use. Any failure, including
/// a bridge that could not start, reads as `false`.
#[unsafe(no_mangle)]
pub extern "C" fn IsBiometricAvailable() -> bool {
    guard("IsBiometricAvailable", false, || match global::bridge() {
        Ok(bridge) => bridge.is_available(),
        Err(_) => false,
    })
}

/// Name of an outcome kind code (`"Success"`, `"UserCancel"`, …).
///
/// Unknown codes yield `"Unknown"`. The returned string is static.
#[unsafe(no_mangle)]
pub extern "C" fn BiometricOutcomeKindName(code: i32) -> *const c_char {
    let name = match OutcomeKind::from_code(code) {
        Ok(OutcomeKind::Success) => c"Success",
        Ok(OutcomeKind::UserCancel) => c"UserCancel",
        Ok(OutcomeKind::AuthenticationFailed) => c"AuthenticationFailed",
        Ok(OutcomeKind::Unavailable) => c"Unavailable",
        Ok(OutcomeKind::SystemError) => c"SystemError",
        Err(_) => c"Unknown",
    };
    name.as_ptr()
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Starts a biometric authentication with a user-facing `reason`.
///
/// Returns immediately. Exactly one outcome follows through the registered
/// handlers (or is parked until one registers). A NULL, empty, or
/// whitespace-only `reason` is replaced by the configured fallback; invalid
/// UTF-8 is replaced lossily.
///
/// # Safety
/// `reason` must be NULL or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn AuthenticateBiometric(reason: *const c_char) {
    // SAFETY: forwarded from this function's contract.
    let reason = unsafe { string_from_ptr(reason) };

    guard("AuthenticateBiometric", (), || match global::bridge() {
        Ok(bridge) => {
            bridge.authenticate(&reason);
        }
        Err(e) => global::host().deliver(AuthOutcome::failure(
            NO_REQUEST,
            OutcomeKind::SystemError,
            format!("biometric bridge unavailable: {e}"),
        )),
    });
}

// ---------------------------------------------------------------------------
// Registration and configuration
// ---------------------------------------------------------------------------

/// Registers the typed outcome callback, replacing any previous one.
/// NULL clears it.
///
/// Outcomes that arrived with no handler registered are delivered to
/// `callback` before this returns. `user_data` is passed back verbatim on
/// every call, from bridge worker threads; the host is responsible for
/// whatever synchronization it needs.
#[unsafe(no_mangle)]
pub extern "C" fn RegisterBiometricCallback(
    callback: Option<BiometricCallback>,
    user_data: *mut c_void,
) {
    guard("RegisterBiometricCallback", (), || {
        global::host().set_callback(callback, user_data);
    });
}

/// Registers the engine-style message handler, replacing any previous one.
/// NULL clears it.
///
/// Messages are addressed by the configured route (`object`, per-kind
/// method names, payload format). Same threading and flushing rules as
/// [`RegisterBiometricCallback`].
#[unsafe(no_mangle)]
pub extern "C" fn RegisterBiometricMessageHandler(
    handler: Option<BiometricMessageHandler>,
    user_data: *mut c_void,
) {
    guard("RegisterBiometricMessageHandler", (), || {
        global::host().set_message_handler(handler, user_data);
    });
}

/// Configures the bridge from a JSON object.
///
/// Only honored before the first `IsBiometricAvailable` or
/// `AuthenticateBiometric` call. Returns `false`, and changes nothing, if
/// `json` is NULL or invalid, or if the bridge has already started.
///
/// # Safety
/// `json` must be NULL or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ConfigureBiometricBridge(json: *const c_char) -> bool {
    if json.is_null() {
        return false;
    }
    // SAFETY: non-NULL, and valid per this function's contract.
    let json = unsafe { string_from_ptr(json) };

    guard("ConfigureBiometricBridge", false, || {
        match global::configure(&json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "bridge configuration rejected");
                false
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Runs `f`, turning a panic into `fallback`.
///
/// A panic inside `AuthenticateBiometric` after the request was accepted
/// still produces its outcome: the request's delivery guard reports it as
/// abandoned while unwinding.
fn guard<T>(entry: &'static str, fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        tracing::error!(entry, "panic caught at the C boundary");
        fallback
    })
}

/// Copies a C string. NULL becomes the empty string.
///
/// # Safety
/// `ptr` must be NULL or a valid NUL-terminated string.
unsafe fn string_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-NULL and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}
