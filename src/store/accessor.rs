//! Typed store accessor: the only way the rest of the crate touches storage.
//!
//! Always passed in explicitly (constructor injection), never reached
//! through a global, so every component runs unchanged against the
//! in-memory backend in tests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use super::{ChangeEvent, ChangeNotifier, StoreBackend};

/// Read/write wrapper over a [`StoreBackend`] with get-with-default and
/// set-with-notify semantics. Cloning yields another handle onto the same
/// backend and notification hub (another "tab" onto the same storage).
#[derive(Clone)]
pub struct StoreAccessor {
    backend: StoreBackend,
    notifier: ChangeNotifier,
}

impl StoreAccessor {
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            backend,
            notifier: ChangeNotifier::new(),
        }
    }

    /// An accessor over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(StoreBackend::memory())
    }

    /// Load the value stored under `key`, or `default` when the key is
    /// absent, unreadable, or fails to parse into `T`. Never errors; a bad
    /// stored shape takes the same fallback path as a parse failure.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.read_raw(key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Error reading {} from store: {}", key, err);
                return default;
            }
        };

        let Some(raw) = raw else {
            return default;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Stored value under {} is not valid: {}", key, err);
                default
            }
        }
    }

    /// Serialize `value` and write it under `key`, then broadcast the
    /// change. A write failure is logged and swallowed: the commit is
    /// best-effort, and no notification fires for a value that was never
    /// stored.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Error serializing {}: {}", key, err);
                return;
            }
        };

        match self.backend.write_raw(key, &raw).await {
            Ok(()) => self.notifier.publish(key),
            Err(err) => tracing::error!("Error saving {} to store: {}", key, err),
        }
    }

    /// Remove `key` and broadcast the change. Best-effort like [`save`].
    ///
    /// [`save`]: StoreAccessor::save
    pub async fn remove(&self, key: &str) {
        match self.backend.remove_raw(key).await {
            Ok(()) => self.notifier.publish(key),
            Err(err) => tracing::error!("Error removing {} from store: {}", key, err),
        }
    }

    /// Whether any value is stored under `key`. Used by the bootstrap
    /// seeding, which must not clobber existing edits.
    pub async fn contains(&self, key: &str) -> bool {
        match self.backend.contains(key).await {
            Ok(present) => present,
            Err(err) => {
                tracing::warn!("Error probing {} in store: {}", key, err);
                false
            }
        }
    }

    /// Subscribe to change events for every key in this accessor family.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }
}
