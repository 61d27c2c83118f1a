//! # rp-auth-open
//!
//! Open-access implementation of `AccessPolicy`.
//! Every session resolves to `Admin` and every action is allowed; "login"
//! only edits the display profile. Swap this plugin for a real role check
//! if the portal ever leaves the trusted intranet.

use rp_core::models::{Identity, Role};
use rp_core::traits::{AccessPolicy, Action};

#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccessPolicy;

impl OpenAccessPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AccessPolicy for OpenAccessPolicy {
    fn resolve_role(&self, _identity: &Identity) -> Role {
        Role::Admin
    }

    fn authorize(&self, identity: &Identity, action: Action) -> bool {
        tracing::trace!(user = %identity.id, ?action, "open access granted");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::defaults::default_identity;

    #[test]
    fn everyone_is_admin() {
        let policy = OpenAccessPolicy::new();
        let mut guest = default_identity();
        guest.role = Role::Guest;

        assert_eq!(policy.resolve_role(&guest), Role::Admin);
        assert!(policy.authorize(&guest, Action::EditSiteContent));
        assert!(policy.authorize(&guest, Action::ApproveUsers));
    }
}
