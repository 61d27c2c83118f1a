//! # Stores
//!
//! Explicit state holders handed to views by `Arc`. Board and site content
//! mirror every mutation to a [`KvStore`]; identity lives only in memory.
//!
//! Each store runs a mutation and its write-back under one lock, so readers
//! never observe a state that has not been queued for persistence. Storage
//! is not coordinated across processes: whoever writes last wins.

mod board;
mod identity;
mod site;

pub use board::BoardStore;
pub use identity::IdentityStore;
pub use site::SiteStore;

use serde::{de::DeserializeOwned, Serialize};

use crate::traits::KvStore;

/// Reads `key`, falling back to `default` when the entry is absent, cannot
/// be read, or does not parse.
///
/// Absent and corrupt entries are replaced by the fallback. A failed read
/// leaves storage untouched: the entry may still be intact on disk.
async fn load_or_seed<T, F>(storage: &dyn KvStore, key: &str, default: F) -> T
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    let raw = match storage.get(key).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed, using built-in defaults");
            return default();
        }
    };

    if let Some(raw) = raw {
        match serde_json::from_str(&raw) {
            Ok(value) => return value,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored entry is corrupt, using built-in defaults");
            }
        }
    } else {
        tracing::debug!(key, "no stored entry, seeding built-in defaults");
    }

    let value = default();
    persist(storage, key, &value).await;
    value
}

/// Serializes and writes `value`. Failures are logged and swallowed.
async fn persist<T: Serialize + ?Sized>(storage: &dyn KvStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(key, error = %e, "failed to serialize store snapshot");
            return;
        }
    };

    if let Err(e) = storage.put(key, &json).await {
        tracing::warn!(key, error = %e, "failed to persist store snapshot");
    }
}
