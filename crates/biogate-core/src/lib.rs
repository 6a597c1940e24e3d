//! Biometric authentication request lifecycle for Biogate.
//!
//! This crate is the part of the bridge that has rules:
//!
//! 1. **Availability**: a synchronous yes/no that never fails
//!    ([`BiometricGate::is_available`])
//! 2. **Requests**: one OS prompt per call, run off the calling thread
//!    ([`BiometricGate::authenticate`])
//! 3. **Delivery**: exactly one [`AuthOutcome`] per request, through a
//!    one-shot [`OutcomeSink`]
//!
//! # How it fits in the stack
//!
//! ```text
//! C ABI (above)        ← entry points, host callbacks, global runtime
//!     ↕
//! Core (this crate)    ← request ids, reason rules, overlap policy, outcomes
//!     ↕
//! Platform (below)     ← LocalAuthentication / Windows Hello / fake
//! ```
//!
//! [`AuthOutcome`]: biogate_protocol::AuthOutcome

mod config;
mod error;
mod gate;
mod request;
mod sink;

pub use config::{DEFAULT_REASON, GateConfig, OverlapPolicy};
pub use error::GateError;
pub use gate::BiometricGate;
pub use request::{AuthRequest, Reason};
pub use sink::{Delivery, OutcomeSink};
