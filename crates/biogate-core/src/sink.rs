//! One-shot outcome delivery.
//!
//! The host's callback channel is modelled as a sink that is consumed by
//! delivering into it. [`Delivery`] wraps a sink and enforces the other
//! half of the contract: if it is dropped without delivering, it delivers
//! a `SystemError` on its way out. Between the two, a request can produce
//! neither zero nor two outcomes.

use biogate_protocol::{AuthOutcome, RequestId};

use crate::GateError;

/// Receives the outcome of one request.
///
/// `deliver` takes `self` by value, so a sink can be used only once.
/// Any `FnOnce(AuthOutcome) + Send + 'static` closure is a sink.
///
/// Delivery happens on a runtime worker thread, not on the thread that
/// called `authenticate`. Sinks must do their own thread hop if the host
/// needs one.
pub trait OutcomeSink: Send + 'static {
    /// Hands the outcome to the host.
    fn deliver(self, outcome: AuthOutcome);
}

impl<F> OutcomeSink for F
where
    F: FnOnce(AuthOutcome) + Send + 'static,
{
    fn deliver(self, outcome: AuthOutcome) {
        self(outcome)
    }
}

/// Exactly-once guard around an [`OutcomeSink`].
pub struct Delivery<S: OutcomeSink> {
    request_id: RequestId,
    sink: Option<S>,
}

impl<S: OutcomeSink> Delivery<S> {
    /// Wraps `sink` for the given request.
    pub fn new(request_id: RequestId, sink: S) -> Self {
        Self {
            request_id,
            sink: Some(sink),
        }
    }

    /// The request this delivery belongs to.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Delivers `outcome`, consuming the guard.
    pub fn deliver(mut self, outcome: AuthOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: AuthOutcome) {
        if let Some(sink) = self.sink.take() {
            tracing::info!(
                request_id = %outcome.request_id(),
                kind = %outcome.kind(),
                "delivering authentication outcome"
            );
            sink.deliver(outcome);
        }
    }
}

impl<S: OutcomeSink> Drop for Delivery<S> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            let err = GateError::Abandoned;
            tracing::warn!(request_id = %self.request_id, "request dropped without an outcome");
            let outcome =
                AuthOutcome::failure(self.request_id, err.outcome_kind(), err.to_string());
            self.send(outcome);
        }
    }
}
