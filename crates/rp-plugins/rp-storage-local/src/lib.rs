//! # rp-storage-local
//! rnd-portal/crates/rp-plugins/rp-storage-local/src/lib.rs
//! Local filesystem implementation of `KvStore`.
//! Each entry is a `<key>.json` file under one root directory.

use async_trait::async_trait;
use rp_core::error::AppError;
use rp_core::traits::KvStore;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

pub struct LocalKvStore {
    /// Directory holding one file per entry (e.g., "./data")
    root_path: PathBuf,
}

impl LocalKvStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps a key to its file, rejecting anything that could escape the
    /// root directory.
    fn entry_path(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::ValidationError(format!("invalid storage key {key:?}")));
        }

        let mut path = self.root_path.clone();
        path.push(format!("{key}.json"));
        Ok(path)
    }
}

#[async_trait]
impl KvStore for LocalKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file then renames it over the entry, so a
    /// crash mid-write leaves the previous snapshot intact. Every write gets
    /// its own temp file; concurrent writers of one key never share one.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let target_path = self.entry_path(key)?;
        fs::create_dir_all(&self.root_path).await?;

        let mut tmp_path = self.root_path.clone();
        tmp_path.push(format!(".{key}.{}.tmp", Uuid::now_v7().simple()));

        let written = match fs::write(&tmp_path, value).await {
            Ok(()) => fs::rename(&tmp_path, &target_path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        tracing::trace!(key, bytes = value.len(), "entry written");
        Ok(())
    }
}
