//! # rp-portal
//!
//! The orchestration layer the portal views talk to. It wires the stores
//! to the access policy and the completion gateway, builds posts and
//! comments from the session identity, and hands out XP rewards.

pub mod assistant;
pub mod handlers;

use std::sync::Arc;

use rp_core::models::LevelUpPolicy;
use rp_core::stores::{BoardStore, IdentityStore, SiteStore};
use rp_core::traits::{AccessPolicy, CompletionGateway, KvStore};

pub use assistant::{
    Assistant, LabTopic, Persona, PromptTemplate, LAB_TOPICS, OFFICE_TEMPLATES, RND_TEMPLATES,
};
pub use handlers::NewPost;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct PortalOptions {
    pub model: String,
    pub level_up: LevelUpPolicy,
}

impl Default for PortalOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            level_up: LevelUpPolicy::default(),
        }
    }
}

/// Everything a view needs, shared by handle.
pub struct Portal {
    pub identity: Arc<IdentityStore>,
    pub site: Arc<SiteStore>,
    pub board: Arc<BoardStore>,
    pub policy: Box<dyn AccessPolicy>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub model: String,
}

impl Portal {
    /// Loads site content and the board before anything can read them;
    /// the identity starts at its default.
    pub async fn init(
        storage: Arc<dyn KvStore>,
        policy: Box<dyn AccessPolicy>,
        gateway: Arc<dyn CompletionGateway>,
        options: PortalOptions,
    ) -> Self {
        let site = Arc::new(SiteStore::load(storage.clone()).await);
        let board = Arc::new(BoardStore::load(storage).await);
        let identity = Arc::new(IdentityStore::new(options.level_up));

        if !gateway.is_configured() {
            tracing::warn!("completion gateway has no credential; assistants will answer with a notice");
        }

        Self {
            identity,
            site,
            board,
            policy,
            gateway,
            model: options.model,
        }
    }

    /// A fresh conversation with `persona`.
    pub fn assistant(&self, persona: Persona) -> Assistant {
        Assistant::new(
            persona,
            self.identity.clone(),
            self.gateway.clone(),
            self.model.clone(),
        )
    }
}
