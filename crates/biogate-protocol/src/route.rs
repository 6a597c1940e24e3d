//! Message routing for hosts with engine-style message dispatch.
//!
//! Game engines commonly deliver native events by name: a target object,
//! a method on it, and a single string argument (Unity's
//! `UnitySendMessage(object, method, message)` is the canonical example).
//! [`HostRoute`] describes where each outcome goes; [`HostRoute::message_for`]
//! turns an outcome into a ready-to-send [`HostMessage`].
//!
//! ```text
//! Success                          → on_success
//! UserCancel, AuthenticationFailed → on_failed
//! Unavailable, SystemError         → on_error
//! ```

use serde::{Deserialize, Serialize};

use crate::{AuthOutcome, OutcomeKind, ProtocolError, encode_outcome};

/// What goes in a message's string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// The outcome's detail text (empty on success).
    #[default]
    Detail,
    /// The full outcome as JSON (see [`encode_outcome`]).
    Json,
}

/// Where outcomes are delivered in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostRoute {
    /// Name of the host object receiving the messages.
    pub object: String,
    /// Method invoked for [`OutcomeKind::Success`].
    pub on_success: String,
    /// Method invoked when the user was not authenticated.
    pub on_failed: String,
    /// Method invoked when the request could not run at all.
    pub on_error: String,
    /// Payload format.
    pub payload: PayloadFormat,
}

impl Default for HostRoute {
    fn default() -> Self {
        Self {
            object: "FingerprintManager".to_string(),
            on_success: "OnSuccess".to_string(),
            on_failed: "OnFailed".to_string(),
            on_error: "OnError".to_string(),
            payload: PayloadFormat::Detail,
        }
    }
}

impl HostRoute {
    /// The method name an outcome of this kind is routed to.
    pub fn method_for(&self, kind: OutcomeKind) -> &str {
        match kind {
            OutcomeKind::Success => &self.on_success,
            OutcomeKind::UserCancel | OutcomeKind::AuthenticationFailed => &self.on_failed,
            OutcomeKind::Unavailable | OutcomeKind::SystemError => &self.on_error,
        }
    }

    /// Builds the message delivering `outcome`.
    ///
    /// # Errors
    /// [`ProtocolError::Encode`] if the JSON payload cannot be produced.
    pub fn message_for(&self, outcome: &AuthOutcome) -> Result<HostMessage, ProtocolError> {
        let payload = match self.payload {
            PayloadFormat::Detail => outcome.detail().unwrap_or_default().to_string(),
            PayloadFormat::Json => encode_outcome(outcome)?,
        };
        Ok(HostMessage {
            object: self.object.clone(),
            method: self.method_for(outcome.kind()).to_string(),
            payload,
        })
    }
}

/// One routed outcome, ready to hand to the host's dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMessage {
    /// Target object name.
    pub object: String,
    /// Method to invoke on it.
    pub method: String,
    /// Single string argument.
    pub payload: String,
}
