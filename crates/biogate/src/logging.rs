//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::DEFAULT_LOG_FILTER;

/// Installs a `fmt` subscriber filtered by `filter`.
///
/// Does nothing if the process already has a global subscriber (the host,
/// or an earlier call, installed one). Unparsable directives fall back to
/// [`DEFAULT_LOG_FILTER`]. ANSI colors are off: host consoles (Xcode,
/// the Unity editor log) don't render them.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .try_init();
}
