//! The authentication request and its reason text.

use std::fmt;

use biogate_protocol::RequestId;

use crate::DEFAULT_REASON;

/// The user-facing text shown inside the OS prompt.
///
/// Always non-empty. The text is opaque: it is trimmed and otherwise
/// passed through untouched, never parsed or localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason(String);

impl Reason {
    /// Normalizes a caller-supplied reason.
    ///
    /// Blank input falls back to `fallback`, and a blank fallback falls
    /// back to [`DEFAULT_REASON`], so the result is never empty.
    pub fn resolve(raw: &str, fallback: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Self(trimmed.to_string());
        }
        let fallback = fallback.trim();
        if fallback.is_empty() {
            Self(DEFAULT_REASON.to_string())
        } else {
            Self(fallback.to_string())
        }
    }

    /// The text to display.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One outstanding authentication request.
///
/// Lives from the `authenticate` call until its outcome is delivered.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    id: RequestId,
    reason: Reason,
}

impl AuthRequest {
    pub(crate) fn new(id: RequestId, reason: Reason) -> Self {
        Self { id, reason }
    }

    /// The request id.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The normalized reason.
    pub fn reason(&self) -> &Reason {
        &self.reason
    }
}
