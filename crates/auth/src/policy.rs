//! Role → permission table.
//!
//! The table is configuration: a built-in default ships with the crate and a
//! deployment can replace it with JSON. Resource names are canonically plural
//! (`purchases`, `consignments`, `suppliers`); singular spellings only match when
//! the policy declares them in `aliases`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("policy is not valid JSON: {0}")]
    Parse(String),

    #[error("role '{role}' lists malformed permission '{permission}'")]
    InvalidPermission { role: String, permission: String },

    #[error("alias '{alias}' points at another alias '{target}'")]
    AliasChain { alias: String, target: String },
}

/// Static role table plus declared resource aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePolicy {
    roles: BTreeMap<String, BTreeSet<Permission>>,
    aliases: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default)]
    roles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl RolePolicy {
    /// A policy with no roles and no aliases (only administrators pass checks).
    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// The default table shipped with the terminal.
    pub fn builtin() -> Self {
        Self::empty()
            .with_alias("purchase", "purchases")
            .with_alias("consignment", "consignments")
            .with_alias("supplier", "suppliers")
            .with_alias("sale", "sales")
            .with_role(
                "Manager",
                [
                    "dashboard.view",
                    "inventory.manage",
                    "menu.manage",
                    "suppliers.manage",
                    "consignments.manage",
                    "purchases.manage",
                    "sales.view",
                    "sales.create",
                    "reports.view",
                    "staff.view",
                ],
            )
            .with_role(
                "Cashier",
                [
                    "dashboard.view",
                    "sales.create",
                    "sales.view",
                    "menu.view",
                    "inventory.view",
                ],
            )
            .with_role(
                "Inventory",
                [
                    "dashboard.view",
                    "inventory.manage",
                    "consignments.view",
                    "consignments.create",
                    "suppliers.view",
                    "purchases.view",
                    "purchases.create",
                ],
            )
            .with_role(
                "Supplier",
                ["dashboard.view", "consignments.view", "purchases.view"],
            )
    }

    /// Load a policy from JSON:
    ///
    /// ```json
    /// { "roles": { "Cashier": ["sales.create"] }, "aliases": { "sale": "sales" } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicy =
            serde_json::from_str(json).map_err(|e| PolicyError::Parse(e.to_string()))?;

        for (alias, target) in &raw.aliases {
            if raw.aliases.contains_key(target) {
                return Err(PolicyError::AliasChain {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }

        let mut policy = Self::empty();
        policy.aliases = raw
            .aliases
            .into_iter()
            .map(|(alias, target)| (alias.trim().to_string(), target.trim().to_string()))
            .collect();

        for (role, names) in raw.roles {
            let mut granted = BTreeSet::new();
            for name in names {
                let permission =
                    Permission::parse(&name).map_err(|_| PolicyError::InvalidPermission {
                        role: role.clone(),
                        permission: name.clone(),
                    })?;
                granted.insert(policy.canonical(&permission));
            }
            policy.roles.insert(Role::new(role).key(), granted);
        }

        Ok(policy)
    }

    pub fn with_role<I, P>(mut self, role: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        let granted = permissions
            .into_iter()
            .map(|p| self.canonical(&p.into()))
            .collect();
        self.roles.insert(Role::new(role.to_string()).key(), granted);
        self
    }

    /// Declare `alias` as another spelling of the canonical resource `canonical`.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.aliases.insert(alias.to_string(), canonical.to_string());
        let roles = std::mem::take(&mut self.roles);
        self.roles = roles
            .into_iter()
            .map(|(role, set)| (role, set.iter().map(|p| self.canonical(p)).collect()))
            .collect();
        self
    }

    /// Rewrites the resource part of `permission` to its canonical spelling.
    pub fn canonical(&self, permission: &Permission) -> Permission {
        canonicalize(&self.aliases, permission)
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Default permissions of `role`, already canonical.
    pub fn permissions_for(&self, role: &Role) -> Option<&BTreeSet<Permission>> {
        self.roles.get(&role.key())
    }

    pub fn knows_role(&self, role: &Role) -> bool {
        role.is_admin() || self.roles.contains_key(&role.key())
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Does `role` (by its defaults alone) hold `required`?
    pub fn role_grants(&self, role: &Role, required: &Permission) -> bool {
        if role.is_admin() {
            return true;
        }
        self.permissions_for(role)
            .is_some_and(|granted| set_grants(granted, &self.canonical(required)))
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) fn canonicalize(aliases: &BTreeMap<String, String>, permission: &Permission) -> Permission {
    match (permission.resource(), permission.action()) {
        (Some(resource), Some(action)) => match aliases.get(resource) {
            Some(canonical) => Permission::of(canonical, action),
            None => permission.clone(),
        },
        _ => permission.clone(),
    }
}

/// Membership check with wildcard and `resource.manage` expansion.
///
/// Both `granted` and `required` must already be canonical.
pub(crate) fn set_grants(granted: &BTreeSet<Permission>, required: &Permission) -> bool {
    matching_grant(granted, required).is_some()
}

/// The grant that satisfies `required`, if any.
pub(crate) fn matching_grant<'a>(
    granted: &'a BTreeSet<Permission>,
    required: &Permission,
) -> Option<&'a Permission> {
    if let Some(exact) = granted.get(required) {
        return Some(exact);
    }
    if let Some(manage) = required
        .resource()
        .and_then(|resource| granted.get(&Permission::manage_of(resource)))
    {
        return Some(manage);
    }
    granted.iter().find(|p| p.is_wildcard())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cashier_defaults() {
        let policy = RolePolicy::builtin();
        let cashier = Role::new("Cashier");
        assert!(policy.role_grants(&cashier, &"sales.create".into()));
        assert!(!policy.role_grants(&cashier, &"staff.delete".into()));
    }

    #[test]
    fn admin_needs_no_table_entry() {
        let policy = RolePolicy::empty();
        assert!(policy.role_grants(&Role::new("Admin"), &"anything.at_all".into()));
    }

    #[test]
    fn manage_covers_every_action_of_its_resource() {
        let policy = RolePolicy::builtin();
        let inventory = Role::new("Inventory");
        assert!(policy.role_grants(&inventory, &"inventory.delete".into()));
        assert!(!policy.role_grants(&inventory, &"menu.delete".into()));
    }

    #[test]
    fn aliases_only_apply_when_declared() {
        let with_alias = RolePolicy::empty()
            .with_role("Buyer", ["purchases.create"])
            .with_alias("purchase", "purchases");
        let without_alias = RolePolicy::empty().with_role("Buyer", ["purchases.create"]);

        let buyer = Role::new("Buyer");
        assert!(with_alias.role_grants(&buyer, &"purchase.create".into()));
        assert!(!without_alias.role_grants(&buyer, &"purchase.create".into()));
    }

    #[test]
    fn loads_from_json() {
        let policy = RolePolicy::from_json(
            r#"{
                "roles": { "Waiter": ["sale.create", "menu.view"] },
                "aliases": { "sale": "sales" }
            }"#,
        )
        .unwrap();

        let waiter = Role::new("waiter");
        let granted = policy.permissions_for(&waiter).unwrap();
        assert!(granted.contains(&Permission::new("sales.create")));
        assert!(policy.role_grants(&waiter, &"sales.create".into()));
    }

    #[test]
    fn json_rejects_bad_permissions_and_alias_chains() {
        let err = RolePolicy::from_json(r#"{ "roles": { "X": ["nodot"] } }"#).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidPermission { .. }));

        let err = RolePolicy::from_json(r#"{ "aliases": { "a": "b", "b": "c" } }"#).unwrap_err();
        assert!(matches!(err, PolicyError::AliasChain { .. }));

        assert!(matches!(
            RolePolicy::from_json("{").unwrap_err(),
            PolicyError::Parse(_)
        ));
    }
}
