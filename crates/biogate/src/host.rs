//! Delivery of outcomes to the host.
//!
//! A host can register two kinds of handler, independently:
//!
//! ```text
//!                         ┌─→ BiometricCallback(kind_code, detail, user_data)
//! AuthOutcome ──→ HostChannel
//!                         └─→ BiometricMessageHandler(object, method, payload, user_data)
//!                                  (addressed by HostRoute, e.g.
//!                                   "FingerprintManager" / "OnFailed" / "dismissed")
//! ```
//!
//! Registering a handler replaces the previous one of the same kind;
//! registering NULL clears it. Outcomes produced while no handler at all is
//! registered are parked (up to [`HostChannel::PARK_CAPACITY`]) and flushed,
//! in order, to the next handler that registers. Outcomes produced during
//! the flush are delivered after the parked ones.
//!
//! Handlers are invoked on bridge worker threads and never while the
//! channel's lock is held, so a handler may call back into the bridge.

use std::collections::VecDeque;
use std::ffi::{CString, c_char, c_void};
use std::sync::{Mutex, MutexGuard, PoisonError};

use biogate_protocol::{AuthOutcome, HostRoute};

use crate::BiogateError;

/// Typed outcome callback: `(kind_code, detail, user_data)`.
///
/// `kind_code` is an `OutcomeKind` code (0 = Success … 4 = SystemError).
/// `detail` is a NUL-terminated UTF-8 string, empty on success, valid only
/// for the duration of the call.
pub type BiometricCallback =
    extern "C" fn(kind_code: i32, detail: *const c_char, user_data: *mut c_void);

/// Engine-style message handler: `(object, method, payload, user_data)`.
///
/// Shaped for "send message to game object" APIs. All three strings are
/// NUL-terminated UTF-8, valid only for the duration of the call.
pub type BiometricMessageHandler = extern "C" fn(
    object: *const c_char,
    method: *const c_char,
    payload: *const c_char,
    user_data: *mut c_void,
);

/// Opaque host pointer handed back verbatim on every call.
#[derive(Clone, Copy)]
struct UserData(*mut c_void);

// SAFETY: the bridge never dereferences the pointer. Whatever it points to
// is the host's to synchronize, as documented on the registration calls.
unsafe impl Send for UserData {}

#[derive(Clone, Copy)]
struct Registered<F: Copy> {
    handler: F,
    user_data: UserData,
}

struct HostState {
    route: HostRoute,
    callback: Option<Registered<BiometricCallback>>,
    messages: Option<Registered<BiometricMessageHandler>>,
    parked: VecDeque<AuthOutcome>,
    /// Set while parked outcomes are being handed out. New outcomes queue
    /// behind them instead of overtaking.
    flushing: bool,
}

impl HostState {
    fn has_handler(&self) -> bool {
        self.callback.is_some() || self.messages.is_some()
    }

    fn targets(&self) -> Targets {
        Targets {
            route: self.route.clone(),
            callback: self.callback,
            messages: self.messages,
        }
    }
}

/// Snapshot of the handlers taken under the lock, invoked after it is
/// released.
struct Targets {
    route: HostRoute,
    callback: Option<Registered<BiometricCallback>>,
    messages: Option<Registered<BiometricMessageHandler>>,
}

/// Routes outcomes to whichever host handlers are registered.
pub struct HostChannel {
    state: Mutex<HostState>,
}

impl Default for HostChannel {
    fn default() -> Self {
        Self::new(HostRoute::default())
    }
}

impl HostChannel {
    /// Outcomes kept while no handler is registered. Older ones are dropped
    /// first.
    pub const PARK_CAPACITY: usize = 16;

    /// Creates a channel with no handlers.
    pub fn new(route: HostRoute) -> Self {
        Self {
            state: Mutex::new(HostState {
                route,
                callback: None,
                messages: None,
                parked: VecDeque::new(),
                flushing: false,
            }),
        }
    }

    /// Replaces the addressing used for the message handler.
    pub fn set_route(&self, route: HostRoute) {
        self.lock().route = route;
    }

    /// Registers (or, with `None`, clears) the typed callback.
    ///
    /// Parked outcomes are flushed to it before this returns.
    pub fn set_callback(&self, callback: Option<BiometricCallback>, user_data: *mut c_void) {
        let mut state = self.lock();
        state.callback = callback.map(|handler| Registered {
            handler,
            user_data: UserData(user_data),
        });
        tracing::debug!(registered = state.callback.is_some(), "outcome callback updated");
        self.flush(state);
    }

    /// Registers (or, with `None`, clears) the message handler.
    ///
    /// Parked outcomes are flushed to it before this returns.
    pub fn set_message_handler(
        &self,
        handler: Option<BiometricMessageHandler>,
        user_data: *mut c_void,
    ) {
        let mut state = self.lock();
        state.messages = handler.map(|handler| Registered {
            handler,
            user_data: UserData(user_data),
        });
        tracing::debug!(registered = state.messages.is_some(), "message handler updated");
        self.flush(state);
    }

    /// Number of outcomes waiting for a handler.
    pub fn parked(&self) -> usize {
        self.lock().parked.len()
    }

    /// Hands `outcome` to every registered handler, or parks it.
    ///
    /// While a flush is running the outcome joins the end of the parked
    /// queue, so handlers see outcomes in the order they were produced.
    pub fn deliver(&self, outcome: AuthOutcome) {
        let mut state = self.lock();
        if !state.has_handler() {
            park(&mut state, outcome);
            return;
        }
        if state.flushing {
            state.parked.push_back(outcome);
            return;
        }
        let targets = state.targets();
        drop(state);
        targets.invoke(&outcome);
    }

    /// Hands out parked outcomes in batches until none are left. Only one
    /// caller flushes at a time; the others leave their outcomes to it.
    fn flush<'a>(&'a self, mut state: MutexGuard<'a, HostState>) {
        if state.flushing {
            return;
        }
        state.flushing = true;
        loop {
            if !state.has_handler() || state.parked.is_empty() {
                state.flushing = false;
                return;
            }
            let pending: Vec<AuthOutcome> = state.parked.drain(..).collect();
            let targets = state.targets();
            drop(state);

            tracing::info!(count = pending.len(), "flushing parked outcomes");
            for outcome in &pending {
                targets.invoke(outcome);
            }
            state = self.lock();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        // Handlers run outside the lock, so a poisoned state is still
        // consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn park(state: &mut HostState, outcome: AuthOutcome) {
    if state.parked.len() >= HostChannel::PARK_CAPACITY {
        if let Some(dropped) = state.parked.pop_front() {
            tracing::warn!(request_id = %dropped.request_id(), "park full, dropping oldest outcome");
        }
    }
    tracing::info!(request_id = %outcome.request_id(), "no host handler registered, parking outcome");
    state.parked.push_back(outcome);
}

impl Targets {
    fn invoke(&self, outcome: &AuthOutcome) {
        if let Some(callback) = self.callback {
            let detail = c_string(outcome.detail().unwrap_or(""));
            (callback.handler)(outcome.kind().code(), detail.as_ptr(), callback.user_data.0);
        }

        if let Some(messages) = self.messages {
            if let Err(e) = send_message(messages, &self.route, outcome) {
                tracing::error!(
                    request_id = %outcome.request_id(),
                    error = %e,
                    "failed to build host message"
                );
            }
        }
    }
}

fn send_message(
    target: Registered<BiometricMessageHandler>,
    route: &HostRoute,
    outcome: &AuthOutcome,
) -> Result<(), BiogateError> {
    let message = route.message_for(outcome)?;
    let object = c_string(&message.object);
    let method = c_string(&message.method);
    let payload = c_string(&message.payload);
    (target.handler)(
        object.as_ptr(),
        method.as_ptr(),
        payload.as_ptr(),
        target.user_data.0,
    );
    Ok(())
}

/// NUL-terminated copy of `text`. Interior NULs become spaces.
fn c_string(text: &str) -> CString {
    CString::new(text.replace('\0', " ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::ptr;

    use biogate_protocol::{OutcomeKind, PayloadFormat, RequestId};

    use super::*;

    // ========================================================================
    // Recorders
    // ========================================================================

    type Calls = Mutex<Vec<(i32, String)>>;
    type Messages = Mutex<Vec<(String, String, String)>>;

    extern "C" fn record_call(kind_code: i32, detail: *const c_char, user_data: *mut c_void) {
        // SAFETY: tests pass a live `Calls` and the bridge passes a valid C string.
        let calls = unsafe { &*(user_data as *const Calls) };
        let detail = unsafe { CStr::from_ptr(detail) }.to_string_lossy().into_owned();
        calls.lock().unwrap().push((kind_code, detail));
    }

    extern "C" fn record_message(
        object: *const c_char,
        method: *const c_char,
        payload: *const c_char,
        user_data: *mut c_void,
    ) {
        // SAFETY: as above.
        let messages = unsafe { &*(user_data as *const Messages) };
        let text = |p: *const c_char| unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned();
        messages
            .lock()
            .unwrap()
            .push((text(object), text(method), text(payload)));
    }

    fn ctx<T>(value: &T) -> *mut c_void {
        value as *const T as *mut c_void
    }

    fn cancel(id: u64) -> AuthOutcome {
        AuthOutcome::failure(RequestId(id), OutcomeKind::UserCancel, "dismissed")
    }

    // ========================================================================
    // Tests
    // ========================================================================

    #[test]
    fn test_deliver_callback_receives_code_and_detail() {
        let calls = Calls::default();
        let channel = HostChannel::default();
        channel.set_callback(Some(record_call), ctx(&calls));

        channel.deliver(cancel(1));
        channel.deliver(AuthOutcome::success(RequestId(2)));

        let calls = calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(1, "dismissed".to_string()), (0, String::new())]
        );
    }

    #[test]
    fn test_deliver_message_handler_uses_route() {
        let messages = Messages::default();
        let channel = HostChannel::new(HostRoute {
            object: "VaultManager".into(),
            ..HostRoute::default()
        });
        channel.set_message_handler(Some(record_message), ctx(&messages));

        channel.deliver(cancel(1));
        channel.deliver(AuthOutcome::failure(
            RequestId(2),
            OutcomeKind::Unavailable,
            "no biometrics enrolled",
        ));

        let messages = messages.lock().unwrap();
        assert_eq!(
            messages[0],
            ("VaultManager".into(), "OnFailed".into(), "dismissed".into())
        );
        assert_eq!(messages[1].1, "OnError");
        assert_eq!(messages[1].2, "no biometrics enrolled");
    }

    #[test]
    fn test_deliver_json_payload() {
        let messages = Messages::default();
        let channel = HostChannel::new(HostRoute {
            payload: PayloadFormat::Json,
            ..HostRoute::default()
        });
        channel.set_message_handler(Some(record_message), ctx(&messages));

        channel.deliver(AuthOutcome::success(RequestId(4)));

        let messages = messages.lock().unwrap();
        assert_eq!(messages[0].1, "OnSuccess");
        assert!(messages[0].2.contains("\"request_id\":4"));
    }

    #[test]
    fn test_deliver_both_handlers_each_called_once() {
        let calls = Calls::default();
        let messages = Messages::default();
        let channel = HostChannel::default();
        channel.set_callback(Some(record_call), ctx(&calls));
        channel.set_message_handler(Some(record_message), ctx(&messages));

        channel.deliver(cancel(1));

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_deliver_without_handler_parks_then_flushes_in_order() {
        let calls = Calls::default();
        let channel = HostChannel::default();

        channel.deliver(cancel(1));
        channel.deliver(AuthOutcome::success(RequestId(2)));
        assert_eq!(channel.parked(), 2);

        channel.set_callback(Some(record_call), ctx(&calls));

        assert_eq!(channel.parked(), 0);
        let codes: Vec<i32> = calls.lock().unwrap().iter().map(|c| c.0).collect();
        assert_eq!(codes, vec![1, 0]);
    }

    #[test]
    fn test_park_drops_oldest_when_full() {
        let calls = Calls::default();
        let channel = HostChannel::default();

        for id in 1..=(HostChannel::PARK_CAPACITY as u64 + 2) {
            channel.deliver(cancel(id));
        }
        assert_eq!(channel.parked(), HostChannel::PARK_CAPACITY);

        channel.set_callback(Some(record_call), ctx(&calls));
        assert_eq!(calls.lock().unwrap().len(), HostChannel::PARK_CAPACITY);
    }

    #[test]
    fn test_set_callback_none_clears_and_parks_again() {
        let calls = Calls::default();
        let channel = HostChannel::default();
        channel.set_callback(Some(record_call), ctx(&calls));
        channel.set_callback(None, ptr::null_mut());

        channel.deliver(cancel(1));

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(channel.parked(), 1);
    }

    #[test]
    fn test_set_callback_replaces_previous() {
        let first = Calls::default();
        let second = Calls::default();
        let channel = HostChannel::default();
        channel.set_callback(Some(record_call), ctx(&first));
        channel.set_callback(Some(record_call), ctx(&second));

        channel.deliver(cancel(1));

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);
    }

    /// Callback context that delivers one more outcome from inside the
    /// first call, the way a worker finishing mid-flush would.
    struct Reentrant {
        channel: HostChannel,
        calls: Calls,
        late: Mutex<Option<AuthOutcome>>,
    }

    extern "C" fn record_and_deliver(
        kind_code: i32,
        detail: *const c_char,
        user_data: *mut c_void,
    ) {
        // SAFETY: the test passes a live `Reentrant`.
        let ctx = unsafe { &*(user_data as *const Reentrant) };
        let detail = unsafe { CStr::from_ptr(detail) }.to_string_lossy().into_owned();
        ctx.calls.lock().unwrap().push((kind_code, detail));
        if let Some(late) = ctx.late.lock().unwrap().take() {
            ctx.channel.deliver(late);
        }
    }

    #[test]
    fn test_flush_outcome_delivered_mid_flush_comes_after_parked() {
        let reentrant = Reentrant {
            channel: HostChannel::default(),
            calls: Calls::default(),
            late: Mutex::new(Some(AuthOutcome::failure(
                RequestId(3),
                OutcomeKind::SystemError,
                "late",
            ))),
        };
        for (id, detail) in [(1, "first"), (2, "second")] {
            reentrant.channel.deliver(AuthOutcome::failure(
                RequestId(id),
                OutcomeKind::UserCancel,
                detail,
            ));
        }

        reentrant.channel.set_callback(Some(record_and_deliver), ctx(&reentrant));

        let calls = reentrant.calls.lock().unwrap();
        let details: Vec<&str> = calls.iter().map(|c| c.1.as_str()).collect();
        assert_eq!(details, vec!["first", "second", "late"]);
        drop(calls);
        assert_eq!(reentrant.channel.parked(), 0);
    }

    #[test]
    fn test_c_string_interior_nul_replaced() {
        assert_eq!(c_string("a\0b").as_bytes(), b"a b");
    }
}
