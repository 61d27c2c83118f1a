use tokio::sync::RwLock;

use crate::defaults::default_identity;
use crate::models::{Identity, LevelUpPolicy, Role};

/// The session identity and its progression counters. Never persisted.
pub struct IdentityStore {
    current: RwLock<Option<Identity>>,
    policy: LevelUpPolicy,
}

impl IdentityStore {
    /// Starts the session with the default identity.
    pub fn new(policy: LevelUpPolicy) -> Self {
        Self {
            current: RwLock::new(Some(default_identity())),
            policy,
        }
    }

    pub async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    /// Overwrites the display fields. The role stays `Admin`: every
    /// session is fully authorized in this build.
    pub async fn set_identity(&self, name: &str, email: &str, department: &str) {
        let mut guard = self.current.write().await;
        let identity = guard.get_or_insert_with(default_identity);
        identity.name = name.to_string();
        identity.email = email.to_string();
        identity.department = department.to_string();
        identity.role = Role::Admin;
        tracing::info!(name, department, "identity updated");
    }

    /// Replaces the session identity with the default one.
    pub async fn reset_identity(&self) {
        *self.current.write().await = Some(default_identity());
        tracing::info!("identity reset to default administrator");
    }

    /// Drops the identity altogether. `gain_xp` is a no-op until the next
    /// `reset_identity` or `set_identity`.
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// Grants `amount` XP. Returns the number of levels gained.
    pub async fn gain_xp(&self, amount: u32) -> u32 {
        let mut guard = self.current.write().await;
        let Some(identity) = guard.as_mut() else {
            return 0;
        };

        let gained = identity.gain_xp(amount, self.policy);
        if gained > 0 {
            tracing::info!(level = identity.level, gained, "level up");
        }
        gained
    }

    /// Everyone is approved on arrival, so there is nothing to approve.
    pub async fn approve_user(&self, user_id: &str) {
        tracing::debug!(user_id, "auto-approved");
    }

    pub async fn pending_users(&self) -> Vec<Identity> {
        Vec::new()
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new(LevelUpPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(level: u32, xp: u32) -> Identity {
        Identity {
            level,
            xp,
            max_xp: Identity::max_xp_for(level),
            ..default_identity()
        }
    }

    #[test]
    fn gain_zero_changes_nothing() {
        let mut id = default_identity();
        let before = id.clone();
        assert_eq!(id.gain_xp(0, LevelUpPolicy::Cascade), 0);
        assert_eq!(id, before);
    }

    #[test]
    fn crossing_the_threshold_levels_up() {
        for policy in [LevelUpPolicy::Single, LevelUpPolicy::Cascade] {
            let mut id = at(4, 399);
            id.gain_xp(1, policy);
            assert_eq!((id.level, id.xp, id.max_xp), (5, 0, 500));
        }
    }

    #[test]
    fn default_identity_levels_up_with_legacy_max() {
        let mut id = default_identity();
        id.gain_xp(1000, LevelUpPolicy::Single);
        assert_eq!((id.level, id.xp, id.max_xp), (11, 0, 1100));
    }

    #[test]
    fn single_policy_applies_the_rule_once() {
        let mut id = at(1, 0);
        assert_eq!(id.gain_xp(350, LevelUpPolicy::Single), 1);
        assert_eq!((id.level, id.xp, id.max_xp), (2, 250, 200));
    }

    #[test]
    fn cascade_keeps_xp_below_max() {
        let mut id = at(1, 0);
        assert_eq!(id.gain_xp(350, LevelUpPolicy::Cascade), 2);
        assert_eq!((id.level, id.xp, id.max_xp), (3, 50, 300));
    }

    #[test]
    fn invariant_holds_over_a_grant_sequence() {
        let mut id = default_identity();
        let grants = [0, 5, 10, 15, 50, 999, 1, 12_345, 7, 100_000, 0, 3];
        for amount in grants {
            id.gain_xp(amount, LevelUpPolicy::Cascade);
            assert!(id.xp < id.max_xp, "xp {} >= max {}", id.xp, id.max_xp);
            assert!(id.level >= 1);
        }
    }

    #[tokio::test]
    async fn default_store_policy_restores_the_invariant() {
        let store = IdentityStore::default();
        store.reset_identity().await;

        let gained = store.gain_xp(20_000).await;
        let id = store.current().await.unwrap();
        assert!(gained > 1);
        assert!(id.xp < id.max_xp, "xp {} >= max {}", id.xp, id.max_xp);
    }

    #[tokio::test]
    async fn single_store_policy_levels_once_per_grant() {
        let store = IdentityStore::new(LevelUpPolicy::Single);
        assert_eq!(store.gain_xp(20_000).await, 1);
        assert_eq!(store.current().await.unwrap().level, 11);
    }

    #[tokio::test]
    async fn set_identity_keeps_admin_and_progress() {
        let store = IdentityStore::default();
        store.gain_xp(10).await;
        store.set_identity("홍길동", "hong@example.com", "도료개발팀").await;

        let id = store.current().await.unwrap();
        assert_eq!(id.name, "홍길동");
        assert_eq!(id.department, "도료개발팀");
        assert_eq!(id.role, Role::Admin);
        assert_eq!(id.xp, 5010);
    }

    #[tokio::test]
    async fn reset_restores_the_default() {
        let store = IdentityStore::default();
        store.set_identity("x", "y", "z").await;
        store.gain_xp(2000).await;

        store.reset_identity().await;
        assert_eq!(store.current().await, Some(default_identity()));
    }

    #[tokio::test]
    async fn gain_xp_without_identity_is_a_no_op() {
        let store = IdentityStore::default();
        store.clear().await;

        assert_eq!(store.gain_xp(500).await, 0);
        assert!(store.current().await.is_none());
        assert!(store.pending_users().await.is_empty());
    }
}
