//! The bridge: a [`BiometricGate`] wired to a [`HostChannel`].

use std::sync::Arc;

use biogate_core::BiometricGate;
use biogate_platform::{Availability, PlatformService};
use biogate_protocol::{AuthOutcome, RequestId};
use tokio::runtime::Handle;

use crate::{BridgeConfig, HostChannel};

/// Connects a platform biometric service to host handlers.
///
/// The C ABI drives one process-wide `Bridge<SystemPlatform>`; Rust hosts
/// and tests can build their own over any [`PlatformService`].
pub struct Bridge<P: PlatformService> {
    gate: BiometricGate<P>,
    host: Arc<HostChannel>,
}

impl<P: PlatformService> Bridge<P> {
    /// Builds a bridge that runs requests on `runtime` and reports to `host`.
    ///
    /// `host` adopts `config.route` for its message handler.
    pub fn new(platform: P, config: &BridgeConfig, host: Arc<HostChannel>, runtime: Handle) -> Self {
        host.set_route(config.route.clone());
        Self {
            gate: BiometricGate::new(platform, config.gate.clone(), runtime),
            host,
        }
    }

    /// The channel outcomes are delivered through.
    pub fn host(&self) -> &Arc<HostChannel> {
        &self.host
    }

    /// The underlying gate.
    pub fn gate(&self) -> &BiometricGate<P> {
        &self.gate
    }

    /// Detailed availability, for hosts that explain why biometrics are off.
    pub fn availability(&self) -> Availability {
        self.gate.availability()
    }

    /// `true` if a prompt could be shown right now. Never shows UI.
    pub fn is_available(&self) -> bool {
        self.availability().is_usable()
    }

    /// Starts a request. The outcome reaches the host's handlers later, on
    /// a runtime thread, exactly once.
    pub fn authenticate(&self, reason: &str) -> RequestId {
        let host = Arc::clone(&self.host);
        self.gate
            .authenticate(reason, move |outcome: AuthOutcome| host.deliver(outcome))
    }
}
