//! In-memory key/value storage for development and testing.
//!
//! Nothing survives the process; not suitable for production use.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::traits::KvStore;

/// A [`KvStore`] backed by a concurrent map. Clones share the same entries,
/// which lets tests simulate a reload by building a fresh store over them.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an entry without going through the async port.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
