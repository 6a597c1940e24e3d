//! Gate configuration.

use serde::{Deserialize, Serialize};

/// Reason shown when the host passes an empty one.
pub const DEFAULT_REASON: &str = "Authenticate to continue";

/// What happens when `authenticate` is called while a request is still
/// outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The new call is not forwarded to the platform. It immediately gets
    /// its own `SystemError` outcome; the outstanding request is untouched.
    #[default]
    Reject,
    /// The new call waits until the outstanding request has delivered its
    /// outcome, then prompts. Waiters are served in lock order, which is
    /// not guaranteed to be call order.
    Queue,
}

/// Configuration for a [`BiometricGate`](crate::BiometricGate).
///
/// Every field has a default, so a partial JSON object (or `{}`) is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Shown in the prompt when the caller's reason is empty or blank.
    pub fallback_reason: String,

    /// Policy for overlapping requests.
    pub overlap: OverlapPolicy,

    /// Re-check availability on the worker right before prompting.
    ///
    /// Catches the device going away between the host's availability
    /// check and the request, and reports it as `Unavailable` without
    /// asking the OS to present a prompt it cannot show.
    pub precheck_availability: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fallback_reason: DEFAULT_REASON.to_string(),
            overlap: OverlapPolicy::Reject,
            precheck_availability: true,
        }
    }
}
