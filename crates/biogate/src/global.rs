//! Process-wide bridge state behind the C ABI.
//!
//! ```text
//! HOST ─────────── created on first touch; handlers may register any time
//! PENDING_CONFIG ─ set by ConfigureBiometricBridge, consumed at start
//! GLOBAL ───────── started on the first availability/authenticate call:
//!                  logging → runtime → Bridge<SystemPlatform>
//! ```
//!
//! Once `GLOBAL` is set it never changes. If the runtime cannot be built,
//! that failure is remembered and every later request is answered with a
//! `SystemError` outcome.

use std::sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError};

use biogate_platform::SystemPlatform;
use tokio::runtime::{Builder, Runtime};

use crate::{BiogateError, Bridge, BridgeConfig, HostChannel, init_logging};

pub(crate) struct GlobalBridge {
    // Owns the worker threads for the life of the process.
    _runtime: Runtime,
    pub(crate) bridge: Bridge<SystemPlatform>,
}

static HOST: LazyLock<Arc<HostChannel>> = LazyLock::new(|| Arc::new(HostChannel::default()));
static PENDING_CONFIG: ConfigSlot = ConfigSlot::new();
static GLOBAL: OnceLock<Result<GlobalBridge, String>> = OnceLock::new();

pub(crate) fn host() -> &'static Arc<HostChannel> {
    &HOST
}

/// The started bridge, starting it on first call.
pub(crate) fn bridge() -> Result<&'static Bridge<SystemPlatform>, &'static str> {
    GLOBAL
        .get_or_init(|| {
            start().map_err(|e| {
                tracing::error!(error = %e, "biometric bridge failed to start");
                e.to_string()
            })
        })
        .as_ref()
        .map(|global| &global.bridge)
        .map_err(String::as_str)
}

/// Stores `json` as the configuration the bridge will start with.
pub(crate) fn configure(json: &str) -> Result<(), BiogateError> {
    PENDING_CONFIG.store(BridgeConfig::from_json(json)?)
}

fn start() -> Result<GlobalBridge, BiogateError> {
    let config = PENDING_CONFIG.consume();

    init_logging(&config.log_filter);

    let runtime = Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("biogate-worker")
        .enable_all()
        .build()
        .map_err(BiogateError::Runtime)?;

    let bridge = Bridge::new(
        SystemPlatform::new(),
        &config,
        Arc::clone(&HOST),
        runtime.handle().clone(),
    );

    tracing::info!(
        worker_threads = config.worker_threads,
        overlap = ?config.gate.overlap,
        object = %config.route.object,
        "biometric bridge started"
    );

    Ok(GlobalBridge {
        _runtime: runtime,
        bridge,
    })
}

// ---------------------------------------------------------------------------
// Pending configuration
// ---------------------------------------------------------------------------

enum Pending {
    Open(Option<BridgeConfig>),
    Consumed,
}

/// Configuration waiting for the bridge to start.
///
/// `store` and `consume` share one lock: once `consume` has run, every
/// later `store` fails, even while the start-up it belongs to is still in
/// progress.
struct ConfigSlot(Mutex<Pending>);

impl ConfigSlot {
    const fn new() -> Self {
        Self(Mutex::new(Pending::Open(None)))
    }

    fn store(&self, config: BridgeConfig) -> Result<(), BiogateError> {
        let mut pending = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *pending {
            Pending::Open(slot) => {
                *slot = Some(config);
                Ok(())
            }
            Pending::Consumed => Err(BiogateError::AlreadyStarted),
        }
    }

    /// Takes the stored configuration (or the default) and closes the slot.
    fn consume(&self) -> BridgeConfig {
        let mut pending = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *pending, Pending::Consumed) {
            Pending::Open(config) => config.unwrap_or_default(),
            Pending::Consumed => BridgeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_slot_consume_returns_stored_config() {
        let slot = ConfigSlot::new();
        let config = BridgeConfig {
            worker_threads: 2,
            ..BridgeConfig::default()
        };
        slot.store(config.clone()).unwrap();

        assert_eq!(slot.consume(), config);
    }

    #[test]
    fn test_config_slot_consume_without_store_is_default() {
        assert_eq!(ConfigSlot::new().consume(), BridgeConfig::default());
    }

    #[test]
    fn test_config_slot_store_after_consume_is_rejected() {
        let slot = ConfigSlot::new();
        slot.consume();

        let err = slot.store(BridgeConfig::default()).unwrap_err();
        assert!(matches!(err, BiogateError::AlreadyStarted));
    }

    #[test]
    fn test_config_slot_store_racing_consume_is_never_lost() {
        for _ in 0..200 {
            let slot = Arc::new(ConfigSlot::new());
            let config = BridgeConfig {
                worker_threads: 3,
                ..BridgeConfig::default()
            };

            let storer = {
                let slot = Arc::clone(&slot);
                let config = config.clone();
                std::thread::spawn(move || slot.store(config).is_ok())
            };
            let used = slot.consume();
            let stored = storer.join().unwrap();

            // A store reported as accepted must be the config that started.
            if stored {
                assert_eq!(used, config);
            } else {
                assert_eq!(used, BridgeConfig::default());
            }
        }
    }
}
