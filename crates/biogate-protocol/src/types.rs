//! Core outcome types.
//!
//! An [`AuthOutcome`] is produced exactly once per authentication request
//! and handed to the host. The core does not keep it afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Identifies one authentication request.
///
/// Ids are assigned by the gate, start at 1 and only grow. They let the
/// host (and the logs) tie an outcome back to the call that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OutcomeKind
// ---------------------------------------------------------------------------

/// Classification of a terminal authentication result.
///
/// The numeric [`code`](Self::code) is what crosses the C boundary, so the
/// discriminants are part of the ABI and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// The user was positively authenticated.
    Success = 0,
    /// The user dismissed the prompt (or picked the fallback and backed out).
    UserCancel = 1,
    /// The biometric did not match within the OS's retry limit.
    AuthenticationFailed = 2,
    /// Hardware or enrollment went away before the challenge completed.
    Unavailable = 3,
    /// Any other platform failure.
    SystemError = 4,
}

impl OutcomeKind {
    /// Every kind, in code order.
    pub const ALL: [OutcomeKind; 5] = [
        Self::Success,
        Self::UserCancel,
        Self::AuthenticationFailed,
        Self::Unavailable,
        Self::SystemError,
    ];

    /// The stable numeric code passed to C callbacks.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a kind by its numeric code.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownCode`] for anything outside `0..=4`.
    pub fn from_code(code: i32) -> Result<Self, ProtocolError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(ProtocolError::UnknownCode(code))
    }

    /// The variant name, e.g. `"UserCancel"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::UserCancel => "UserCancel",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::Unavailable => "Unavailable",
            Self::SystemError => "SystemError",
        }
    }

    /// `true` only for [`OutcomeKind::Success`].
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// AuthOutcome
// ---------------------------------------------------------------------------

/// The terminal result of one authentication request.
///
/// Build one with [`AuthOutcome::success`] or [`AuthOutcome::failure`];
/// the constructors keep `succeeded` and `kind` consistent.
///
/// JSON form:
///
/// ```json
/// {"request_id":3,"succeeded":false,"kind":"UserCancel","detail":"user cancelled the prompt"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    request_id: RequestId,
    succeeded: bool,
    kind: OutcomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl AuthOutcome {
    /// A successful outcome.
    pub fn success(request_id: RequestId) -> Self {
        Self {
            request_id,
            succeeded: true,
            kind: OutcomeKind::Success,
            detail: None,
        }
    }

    /// A failed outcome with a human-readable detail.
    ///
    /// Passing [`OutcomeKind::Success`] here is a logic error; it is
    /// downgraded to [`OutcomeKind::SystemError`] so `succeeded` can never
    /// disagree with `kind`.
    pub fn failure(
        request_id: RequestId,
        kind: OutcomeKind,
        detail: impl Into<String>,
    ) -> Self {
        let kind = if kind.is_success() {
            OutcomeKind::SystemError
        } else {
            kind
        };
        Self {
            request_id,
            succeeded: false,
            kind,
            detail: Some(detail.into()),
        }
    }

    /// The request this outcome terminates.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Whether the user was authenticated.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// The outcome classification.
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Failure detail; `None` on success.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} {}: {}", self.request_id, self.kind, detail),
            None => write!(f, "{} {}", self.request_id, self.kind),
        }
    }
}
