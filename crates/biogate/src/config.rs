//! Bridge configuration.
//!
//! Hosts configure the bridge once, before first use, with a JSON object
//! passed to `ConfigureBiometricBridge`. Every field is optional:
//!
//! ```json
//! {
//!   "gate": { "fallback_reason": "Sign in to continue", "overlap": "reject" },
//!   "route": { "object": "VaultManager", "payload": "detail" },
//!   "log_filter": "biogate=debug",
//!   "worker_threads": 1
//! }
//! ```

use biogate_core::GateConfig;
use biogate_protocol::HostRoute;
use serde::{Deserialize, Serialize};

use crate::BiogateError;

/// Log filter used when none (or an unparsable one) is configured.
pub const DEFAULT_LOG_FILTER: &str = "biogate=info";

/// Full configuration for the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Request lifecycle settings.
    pub gate: GateConfig,

    /// Addressing for the message-handler channel.
    pub route: HostRoute,

    /// `tracing` filter directives, e.g. `"biogate=debug"`.
    pub log_filter: String,

    /// Worker threads for the bridge runtime. Outcomes are delivered on
    /// these threads. Default: 1.
    pub worker_threads: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            route: HostRoute::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            worker_threads: 1,
        }
    }
}

impl BridgeConfig {
    /// Upper bound on `worker_threads`. Requests are serialized anyway.
    pub const MAX_WORKER_THREADS: usize = 4;

    /// Parses and validates a JSON config.
    ///
    /// # Errors
    /// [`BiogateError::Config`] for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, BiogateError> {
        let config: Self = serde_json::from_str(json).map_err(BiogateError::Config)?;
        Ok(config.validated())
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// - `worker_threads` forced into `1..=MAX_WORKER_THREADS`.
    /// - A blank `log_filter` becomes [`DEFAULT_LOG_FILTER`].
    pub fn validated(mut self) -> Self {
        let clamped = self.worker_threads.clamp(1, Self::MAX_WORKER_THREADS);
        if clamped != self.worker_threads {
            tracing::warn!(
                requested = self.worker_threads,
                used = clamped,
                "worker_threads out of range, clamping"
            );
            self.worker_threads = clamped;
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
        self
    }
}
