//! The biometric gate: availability checks and authentication requests.
//!
//! # Concurrency note
//!
//! `authenticate` never blocks. It assigns a request id, resolves the
//! reason, and spawns a task on the runtime the gate was built with. The
//! task talks to the platform service and delivers the outcome from a
//! runtime worker thread.
//!
//! Overlap is governed by a single `tokio::sync::Mutex<()>` slot. A request
//! holds the slot's guard from the moment it is accepted until the platform
//! has answered. The guard is released before the outcome is delivered, so
//! a sink that immediately starts another request is accepted:
//!
//! - `Reject` takes the guard with `try_lock_owned` on the calling thread,
//!   so a second call made while the first is outstanding is refused
//!   synchronously and deterministically.
//! - `Queue` takes the guard with `lock_owned().await` inside the task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use biogate_platform::{Availability, PlatformError, PlatformService};
use biogate_protocol::{AuthOutcome, RequestId};
use tokio::runtime::Handle;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    AuthRequest, Delivery, GateConfig, GateError, OutcomeSink, OverlapPolicy, Reason,
};

/// Runs biometric authentication requests against a [`PlatformService`].
///
/// ## Lifecycle of a request
///
/// ```text
/// authenticate() ──→ [slot acquired] ──→ precheck ──→ evaluate ──→ deliver
///        │                                   │            │
///        │ (Reject, slot taken)              ▼            ▼
///        └──────────→ SystemError      Unavailable   Success / UserCancel /
///                                                    AuthenticationFailed /
///                                                    Unavailable / SystemError
/// ```
pub struct BiometricGate<P: PlatformService> {
    platform: Arc<P>,
    config: GateConfig,
    runtime: Handle,
    slot: Arc<Mutex<()>>,
    next_id: AtomicU64,
}

impl<P: PlatformService> BiometricGate<P> {
    /// Creates a gate that spawns request tasks on `runtime`.
    pub fn new(platform: P, config: GateConfig, runtime: Handle) -> Self {
        Self {
            platform: Arc::new(platform),
            config,
            runtime,
            slot: Arc::new(Mutex::new(())),
            next_id: AtomicU64::new(1),
        }
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Detailed availability. A failed platform query reads as
    /// [`Availability::Unknown`].
    pub fn availability(&self) -> Availability {
        match self.platform.availability() {
            Ok(availability) => {
                tracing::debug!(%availability, "biometric availability");
                availability
            }
            Err(e) => {
                tracing::warn!(error = %e, "biometric availability query failed");
                Availability::Unknown
            }
        }
    }

    /// `true` if a biometric challenge could be presented right now.
    ///
    /// Never fails and never shows UI; every platform error reads as
    /// `false`.
    pub fn is_available(&self) -> bool {
        self.availability().is_usable()
    }

    /// Returns `true` while a request holds the slot.
    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    /// Starts an authentication request and returns immediately.
    ///
    /// `sink` receives exactly one outcome, later, on a runtime thread.
    /// That includes the refusal under [`OverlapPolicy::Reject`], which is
    /// delivered before this method returns.
    pub fn authenticate<S: OutcomeSink>(&self, reason: &str, sink: S) -> RequestId {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let reason = Reason::resolve(reason, &self.config.fallback_reason);
        tracing::debug!(request_id = %id, %reason, "authentication requested");

        let request = AuthRequest::new(id, reason);
        let delivery = Delivery::new(id, sink);

        match self.config.overlap {
            OverlapPolicy::Reject => match Arc::clone(&self.slot).try_lock_owned() {
                Ok(guard) => self.spawn(request, Some(guard), delivery),
                Err(_) => {
                    tracing::warn!(request_id = %id, "rejected: request already outstanding");
                    delivery.deliver(outcome_for(id, Err(GateError::Busy)));
                }
            },
            OverlapPolicy::Queue => self.spawn(request, None, delivery),
        }

        id
    }

    fn spawn<S: OutcomeSink>(
        &self,
        request: AuthRequest,
        guard: Option<OwnedMutexGuard<()>>,
        delivery: Delivery<S>,
    ) {
        let platform = Arc::clone(&self.platform);
        let slot = Arc::clone(&self.slot);
        let precheck = self.config.precheck_availability;

        self.runtime.spawn(async move {
            let guard = match guard {
                Some(guard) => guard,
                None => slot.lock_owned().await,
            };
            let result = run_request(platform, &request, precheck).await;
            // Free the slot first: a host may start the next request from
            // inside its callback.
            drop(guard);
            delivery.deliver(outcome_for(request.id(), result));
        });
    }
}

/// Drives one request against the platform.
async fn run_request<P: PlatformService>(
    platform: Arc<P>,
    request: &AuthRequest,
    precheck: bool,
) -> Result<(), GateError> {
    if precheck {
        // Backends may block on the OS query.
        let query = Arc::clone(&platform);
        let availability = tokio::task::spawn_blocking(move || query.availability())
            .await
            .map_err(|e| GateError::TaskFailed(e.to_string()))?;
        match availability {
            Ok(availability) if availability.is_usable() => {}
            Ok(availability) => {
                tracing::info!(
                    request_id = %request.id(),
                    %availability,
                    "biometrics became unavailable before prompting"
                );
                return Err(PlatformError::from_availability(availability).into());
            }
            Err(e) => {
                return Err(PlatformError::NotAvailable(format!(
                    "availability query failed: {e}"
                ))
                .into());
            }
        }
    }

    tracing::info!(request_id = %request.id(), "presenting biometric prompt");
    let reason = request.reason().as_str().to_owned();

    // The evaluation runs in its own task so a panicking backend becomes
    // a JoinError here instead of taking the delivery down with it.
    tokio::spawn(async move { platform.evaluate(&reason).await })
        .await
        .map_err(|e| GateError::TaskFailed(e.to_string()))??;
    Ok(())
}

fn outcome_for(id: RequestId, result: Result<(), GateError>) -> AuthOutcome {
    match result {
        Ok(()) => AuthOutcome::success(id),
        Err(e) => AuthOutcome::failure(id, e.outcome_kind(), e.to_string()),
    }
}
