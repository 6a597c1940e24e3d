//! Outcome types for Biogate.
//!
//! This crate defines what travels back to the host after an
//! authentication request:
//!
//! - **Types** ([`AuthOutcome`], [`OutcomeKind`], [`RequestId`]): the
//!   terminal result of one request.
//! - **Routing** ([`HostRoute`], [`HostMessage`]): how an outcome is
//!   addressed when the host uses engine-style message dispatch
//!   (`object`, `method`, `payload`) instead of a typed callback.
//! - **Codec** ([`encode_outcome`], [`decode_outcome`]): JSON form of an
//!   outcome, used for message payloads.
//!
//! ```text
//! Platform (PlatformError) → Core (AuthOutcome) → Host (callback / message)
//! ```

mod codec;
mod error;
mod route;
mod types;

pub use codec::{decode_outcome, encode_outcome};
pub use error::ProtocolError;
pub use route::{HostMessage, HostRoute, PayloadFormat};
pub use types::{AuthOutcome, OutcomeKind, RequestId};
