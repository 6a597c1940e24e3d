//! JSON encoding of outcomes.
//!
//! Hosts that receive outcomes as strings (engine message dispatch, web
//! views, scripting layers) get this form. The typed C callback does not
//! use it.

use crate::{AuthOutcome, ProtocolError};

/// Serializes an outcome to a compact JSON object.
///
/// # Errors
/// [`ProtocolError::Encode`] if serialization fails. For the types in this
/// crate that cannot actually happen, but the error is propagated rather
/// than assumed away.
pub fn encode_outcome(outcome: &AuthOutcome) -> Result<String, ProtocolError> {
    serde_json::to_string(outcome).map_err(ProtocolError::Encode)
}

/// Parses an outcome previously produced by [`encode_outcome`].
///
/// # Errors
/// [`ProtocolError::Decode`] on malformed JSON or missing fields.
pub fn decode_outcome(json: &str) -> Result<AuthOutcome, ProtocolError> {
    serde_json::from_str(json).map_err(ProtocolError::Decode)
}
