//! # Biogate
//!
//! Platform biometric authentication (Face ID, Touch ID, Windows Hello)
//! for game engines and other hosts that talk C.
//!
//! The host sees two entry points and a callback:
//!
//! ```c
//! RegisterBiometricCallback(on_outcome, ctx);
//! if (IsBiometricAvailable()) {
//!     AuthenticateBiometric("Unlock your vault");
//! }
//! // later, on a bridge thread: on_outcome(BIOGATE_SUCCESS, "", ctx)
//! ```
//!
//! The full C surface lives in [`ffi`] and `include/biogate.h`. Rust hosts
//! can skip it and drive a [`Bridge`] directly.
//!
//! ## Layers
//!
//! - `biogate-platform`: the OS biometric service behind a trait
//! - `biogate-protocol`: outcomes and host message routing
//! - `biogate-core`: request lifecycle, exactly-once delivery
//! - this crate: host callbacks, configuration, logging, C ABI

mod bridge;
mod config;
mod error;
pub mod ffi;
mod global;
mod host;
mod logging;

pub use bridge::Bridge;
pub use config::{BridgeConfig, DEFAULT_LOG_FILTER};
pub use error::BiogateError;
pub use host::{BiometricCallback, BiometricMessageHandler, HostChannel};
pub use logging::init_logging;

/// Everything a Rust host needs in one import.
pub mod prelude {
    pub use crate::{Bridge, BridgeConfig, BiogateError, HostChannel};
    pub use biogate_core::{BiometricGate, GateConfig, OverlapPolicy};
    pub use biogate_platform::{Availability, PlatformError, PlatformService, SystemPlatform};
    pub use biogate_protocol::{
        AuthOutcome, HostRoute, OutcomeKind, PayloadFormat, RequestId, decode_outcome,
    };
}
