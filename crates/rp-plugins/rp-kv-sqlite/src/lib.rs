//! # rp-kv-sqlite Implementation
//!
//! Stores portal entries as rows of a single `entries` table so several
//! deployments can share one database file.

use async_trait::async_trait;
use rp_core::traits::KvStore;
use sqlx::{sqlite::SqlitePool, Row};

pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Connects and creates the table if needed.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS entries (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await?;
        tracing::info!(url, "sqlite key/value store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    /// Last writer wins; there is no version check.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO entries (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::models::SiteConfigPatch;
    use rp_core::stores::SiteStore;
    use std::sync::Arc;

    // A pool over `sqlite::memory:` opens one database per connection, so
    // tests cap the pool at a single connection.
    async fn memory_store() -> SqliteKvStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL, updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteKvStore { pool }
    }

    #[tokio::test]
    async fn get_put_roundtrip() {
        let store = memory_store().await;
        assert_eq!(store.get("siteConfig").await.unwrap(), None);

        store.put("siteConfig", "one").await.unwrap();
        store.put("siteConfig", "two").await.unwrap();
        assert_eq!(store.get("siteConfig").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn site_updates_are_visible_to_a_second_reader() {
        let store = Arc::new(memory_store().await);

        let site = SiteStore::load(store.clone()).await;
        site.update(SiteConfigPatch {
            main_title: Some("새 제목".to_string()),
            ..Default::default()
        })
        .await;

        let other = SiteStore::load(store).await;
        assert_eq!(other.config().await.main_title, "새 제목");
    }
}
