use std::sync::Arc;

use tokio::sync::RwLock;

use super::{load_or_seed, persist};
use crate::defaults::{default_site_config, SITE_CONFIG_KEY};
use crate::models::{SiteConfig, SiteConfigPatch};
use crate::traits::KvStore;

/// Landing-page copy and notice banner.
pub struct SiteStore {
    config: RwLock<SiteConfig>,
    storage: Arc<dyn KvStore>,
}

impl SiteStore {
    pub async fn load(storage: Arc<dyn KvStore>) -> Self {
        let config = load_or_seed(storage.as_ref(), SITE_CONFIG_KEY, default_site_config).await;
        Self {
            config: RwLock::new(config),
            storage,
        }
    }

    pub async fn reload(&self) {
        let fresh = load_or_seed(self.storage.as_ref(), SITE_CONFIG_KEY, default_site_config).await;
        *self.config.write().await = fresh;
    }

    pub async fn config(&self) -> SiteConfig {
        self.config.read().await.clone()
    }

    /// Merges `patch` and persists the whole result. Contents are not
    /// validated; empty strings are accepted.
    pub async fn update(&self, patch: SiteConfigPatch) -> SiteConfig {
        let mut config = self.config.write().await;
        config.merge(patch);
        persist(self.storage.as_ref(), SITE_CONFIG_KEY, &*config).await;
        tracing::info!("site config updated");
        config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKvStore;

    #[tokio::test]
    async fn first_load_persists_the_default() {
        let kv = MemoryKvStore::new();
        let site = SiteStore::load(Arc::new(kv.clone())).await;

        assert_eq!(site.config().await, default_site_config());
        let stored: SiteConfig = serde_json::from_str(&kv.raw(SITE_CONFIG_KEY).unwrap()).unwrap();
        assert_eq!(stored, default_site_config());
    }

    #[tokio::test]
    async fn partial_update_survives_reload() {
        let kv = MemoryKvStore::new();
        let site = SiteStore::load(Arc::new(kv.clone())).await;

        site.update(SiteConfigPatch {
            notice_title: Some("점검 안내".to_string()),
            show_notice: Some(false),
            main_description: Some(String::new()),
            ..Default::default()
        })
        .await;

        let reloaded = SiteStore::load(Arc::new(kv)).await.config().await;
        let default = default_site_config();
        assert_eq!(reloaded.notice_title, "점검 안내");
        assert!(!reloaded.show_notice);
        assert_eq!(reloaded.main_description, "");
        assert_eq!(reloaded.main_title, default.main_title);
        assert_eq!(reloaded.notice_content, default.notice_content);
    }

    #[tokio::test]
    async fn stored_layout_uses_camel_case() {
        let kv = MemoryKvStore::new();
        SiteStore::load(Arc::new(kv.clone())).await;

        let raw: serde_json::Value = serde_json::from_str(&kv.raw(SITE_CONFIG_KEY).unwrap()).unwrap();
        for field in ["mainTitle", "mainSubtitle", "mainDescription", "noticeTitle", "noticeContent", "showNotice"] {
            assert!(raw.get(field).is_some(), "missing {field}");
        }
    }

    #[tokio::test]
    async fn entry_missing_fields_falls_back_to_default() {
        let kv = MemoryKvStore::new();
        kv.put(SITE_CONFIG_KEY, r#"{"mainTitle":"only"}"#).await.unwrap();

        let site = SiteStore::load(Arc::new(kv)).await;
        assert_eq!(site.config().await, default_site_config());
    }
}
