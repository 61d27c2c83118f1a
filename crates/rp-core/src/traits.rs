//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::models::{Identity, Role};

/// Durable key/value storage holding serialized store snapshots.
///
/// Entries are shared by every session on the device; the last write wins.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the raw entry, or `None` if the key was never written.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces the entry wholesale.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// The external text-generation service.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// One request/response round trip. Transport failures are returned as
    /// errors; the caller decides what the user sees.
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        model: &str,
    ) -> anyhow::Result<String>;

    /// False when no credential is available; callers must not call
    /// `generate` in that case.
    fn is_configured(&self) -> bool;
}

/// Operations gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditSiteContent,
    ApproveUsers,
}

/// Identity and authorization contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AccessPolicy: Send + Sync {
    /// The role a session identity resolves to.
    fn resolve_role(&self, identity: &Identity) -> Role;

    /// Whether `identity` may perform `action`.
    fn authorize(&self, identity: &Identity, action: Action) -> bool;
}
