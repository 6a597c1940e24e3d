//! Drives the C ABI the way a game engine would: register a message
//! handler, check availability, ask to unlock a vault, and react to the
//! JSON outcome it receives.

use std::ffi::{CStr, CString, c_char, c_void};
use std::sync::mpsc;
use std::time::Duration;

use biogate::ffi::{
    AuthenticateBiometric, ConfigureBiometricBridge, IsBiometricAvailable,
    RegisterBiometricMessageHandler,
};
use biogate::prelude::{OutcomeKind, decode_outcome};

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VaultState {
    Locked,
    Unlocked,
    /// Biometrics can't be used; the game should offer another way in.
    NeedsFallback,
}

struct Vault {
    state: VaultState,
    failed_attempts: u32,
}

impl Vault {
    const MAX_ATTEMPTS: u32 = 3;

    fn new() -> Self {
        Self {
            state: VaultState::Locked,
            failed_attempts: 0,
        }
    }

    /// Applies an outcome. Returns `true` if another attempt makes sense.
    fn apply(&mut self, kind: OutcomeKind, detail: &str) -> bool {
        match kind {
            OutcomeKind::Success => {
                self.state = VaultState::Unlocked;
                false
            }
            OutcomeKind::AuthenticationFailed => {
                self.failed_attempts += 1;
                if self.failed_attempts >= Self::MAX_ATTEMPTS {
                    self.state = VaultState::NeedsFallback;
                }
                self.state == VaultState::Locked
            }
            OutcomeKind::UserCancel => false,
            OutcomeKind::Unavailable | OutcomeKind::SystemError => {
                eprintln!("  biometrics unusable: {detail}");
                self.state = VaultState::NeedsFallback;
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Host message handler
// ---------------------------------------------------------------------------

/// `(method, payload)` pairs as an engine's message dispatcher would see
/// them.
type Messages = mpsc::Sender<(String, String)>;

extern "C" fn on_message(
    _object: *const c_char,
    method: *const c_char,
    payload: *const c_char,
    user_data: *mut c_void,
) {
    // SAFETY: `user_data` is the `Messages` registered in `main`, alive for
    // the whole program; the strings are valid for this call.
    let messages = unsafe { &*(user_data as *const Messages) };
    let text = |ptr: *const c_char| unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    let _ = messages.send((text(method), text(payload)));
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CString::new(concat!(
        r#"{"gate":{"fallback_reason":"Unlock your vault"},"#,
        r#""route":{"payload":"json"},"log_filter":"biogate=debug"}"#,
    ))?;
    // SAFETY: `config` is a valid C string for the call.
    if !unsafe { ConfigureBiometricBridge(config.as_ptr()) } {
        eprintln!("bridge configuration rejected, using defaults");
    }

    let (tx, rx) = mpsc::channel::<(String, String)>();
    let messages: &'static Messages = Box::leak(Box::new(tx));
    RegisterBiometricMessageHandler(
        Some(on_message),
        messages as *const Messages as *mut c_void,
    );

    if !IsBiometricAvailable() {
        eprintln!("biometrics not available on this device; trying anyway to show the outcome");
    }

    let reason = CString::new("Unlock your vault")?;
    let mut vault = Vault::new();
    loop {
        // SAFETY: `reason` is a valid C string for the call.
        unsafe { AuthenticateBiometric(reason.as_ptr()) };

        let (method, payload) = rx.recv_timeout(Duration::from_secs(120))?;
        let outcome = decode_outcome(&payload)?;
        eprintln!("{method}: {outcome}");
        if !vault.apply(outcome.kind(), outcome.detail().unwrap_or_default()) {
            break;
        }
    }

    eprintln!("vault is {:?}", vault.state);
    Ok(())
}
