//! Explicit session context: who is signed in and what they may do.
//!
//! A `SessionContext` is built once per sign-in and then handed to whatever
//! needs permission answers (the terminal session, the navigation filter).

use std::collections::{BTreeMap, BTreeSet};

use crate::authorize::AuthzError;
use crate::policy::{canonicalize, matching_grant, RolePolicy};
use crate::{Identity, Permission, Role};

/// Answers "may the current identity do P?".
pub trait PermissionEvaluator {
    /// Administrators bypass every check.
    fn is_admin(&self) -> bool;

    fn has(&self, required: &Permission) -> bool;

    /// Short-circuiting OR. An empty list grants nothing.
    fn has_any(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.has(p))
    }

    /// Short-circuiting AND. An empty list is trivially granted.
    fn has_all(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.has(p))
    }
}

/// Where the effective permission set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    /// Administrator role; nothing is looked up.
    Administrator,
    /// The identity's own permission list, used verbatim.
    Explicit,
    /// Defaults of the identity's role in the policy table.
    RoleDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    identity: Identity,
    source: GrantSource,
    granted: BTreeSet<Permission>,
    aliases: BTreeMap<String, String>,
}

impl SessionContext {
    /// Resolve the effective permissions of `identity` under `policy`.
    ///
    /// Identities that are not active cannot open a session.
    pub fn establish(identity: Identity, policy: &RolePolicy) -> Result<Self, AuthzError> {
        if !identity.is_active() {
            tracing::warn!(staff_id = %identity.id, status = %identity.status, "session refused");
            return Err(AuthzError::Inactive(identity.status));
        }

        let (source, granted) = if identity.role.is_admin() {
            (GrantSource::Administrator, BTreeSet::new())
        } else if let Some(explicit) = &identity.permissions {
            (
                GrantSource::Explicit,
                explicit.iter().map(|p| policy.canonical(p)).collect(),
            )
        } else {
            let defaults = policy.permissions_for(&identity.role).cloned();
            if defaults.is_none() {
                tracing::warn!(role = %identity.role, "role missing from policy; no permissions granted");
            }
            (GrantSource::RoleDefaults, defaults.unwrap_or_default())
        };

        tracing::debug!(
            staff_id = %identity.id,
            role = %identity.role,
            source = ?source,
            granted = granted.len(),
            "session established"
        );

        Ok(Self {
            identity,
            source,
            granted,
            aliases: policy.aliases().clone(),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> &Role {
        &self.identity.role
    }

    pub fn source(&self) -> GrantSource {
        self.source
    }

    /// Effective, canonical permission set (empty for administrators).
    pub fn granted(&self) -> &BTreeSet<Permission> {
        &self.granted
    }

    pub(crate) fn canonical(&self, permission: &Permission) -> Permission {
        canonicalize(&self.aliases, permission)
    }

    /// The grant satisfying `required`, for audit explanations.
    pub(crate) fn matching_grant(&self, required: &Permission) -> Option<&Permission> {
        matching_grant(&self.granted, &self.canonical(required))
    }
}

impl PermissionEvaluator for SessionContext {
    fn is_admin(&self) -> bool {
        self.source == GrantSource::Administrator
    }

    fn has(&self, required: &Permission) -> bool {
        self.is_admin() || self.matching_grant(required).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdentityStatus;
    use proptest::prelude::*;
    use tillpoint_core::StaffId;

    fn session(identity: Identity) -> SessionContext {
        SessionContext::establish(identity, &RolePolicy::builtin()).unwrap()
    }

    #[test]
    fn cashier_uses_role_defaults() {
        let s = session(Identity::new(StaffId::new(), "Cashier"));
        assert_eq!(s.source(), GrantSource::RoleDefaults);
        assert!(s.has(&"sales.create".into()));
        assert!(!s.has(&"staff.delete".into()));
    }

    #[test]
    fn admin_is_granted_anything() {
        let s = session(Identity::new(StaffId::new(), "Admin"));
        assert!(s.has(&"staff.delete".into()));
        assert!(s.has(&"nonsense.whatever".into()));
        assert!(s.has_all(&["a.b".into(), "c.d".into()]));
    }

    #[test]
    fn admin_ignores_explicit_list() {
        let s = session(Identity::new(StaffId::new(), "Admin").with_permissions(["menu.view"]));
        assert!(s.has(&"staff.delete".into()));
    }

    #[test]
    fn explicit_list_replaces_role_defaults() {
        let s = session(Identity::new(StaffId::new(), "Cashier").with_permissions(["reports.view"]));
        assert_eq!(s.source(), GrantSource::Explicit);
        assert!(s.has(&"reports.view".into()));
        assert!(!s.has(&"sales.create".into()));
    }

    #[test]
    fn explicit_list_goes_through_declared_aliases() {
        let s = session(Identity::new(StaffId::new(), "Cashier").with_permissions(["purchase.manage"]));
        assert!(s.has(&"purchases.create".into()));
        assert!(s.has(&"purchase.view".into()));
    }

    #[test]
    fn composite_checks() {
        let s = session(Identity::new(StaffId::new(), "Cashier"));
        assert!(s.has_any(&["staff.delete".into(), "sales.view".into()]));
        assert!(!s.has_all(&["staff.delete".into(), "sales.view".into()]));
        assert!(!s.has_any(&[]));
        assert!(s.has_all(&[]));
    }

    #[test]
    fn unknown_role_gets_nothing() {
        let s = session(Identity::new(StaffId::new(), "Janitor"));
        assert!(!s.has(&"dashboard.view".into()));
    }

    #[test]
    fn inactive_identity_cannot_open_a_session() {
        let identity = Identity::new(StaffId::new(), "Cashier").with_status(IdentityStatus::Suspended);
        let err = SessionContext::establish(identity, &RolePolicy::builtin()).unwrap_err();
        assert_eq!(err, AuthzError::Inactive(IdentityStatus::Suspended));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 300,
            ..ProptestConfig::default()
        })]

        /// `resource.manage` satisfies any action on that resource.
        #[test]
        fn manage_implies_every_action(resource in "[a-z]{1,12}", action in "[a-z_]{1,12}") {
            let manage = format!("{resource}.manage");
            let s = session(Identity::new(StaffId::new(), "Clerk").with_permissions([Permission::new(manage)]));
            prop_assert!(s.has(&Permission::of(&resource, &action)));
        }

        /// Administrators pass regardless of what is asked.
        #[test]
        fn admin_passes_every_check(resource in "[a-z]{1,12}", action in "[a-z]{1,12}") {
            let s = session(Identity::new(StaffId::new(), "administrator"));
            prop_assert!(s.has(&Permission::of(&resource, &action)));
        }
    }
}
