use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tillpoint_core::DomainError;

/// Permission identifier.
///
/// Permissions are `resource.action` strings (e.g. "inventory.edit").
/// `resource.manage` stands in for every action on that resource, and the
/// special wildcard `"*"` stands in for everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

/// Action that implies every other action on the same resource.
pub const MANAGE_ACTION: &str = "manage";

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Compile-time permission constant.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Build and check a permission string supplied at runtime (config, records).
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name == "*" {
            return Ok(Self::new("*"));
        }
        match name.split_once('.') {
            Some((resource, action))
                if !resource.is_empty() && !action.is_empty() && !action.contains('.') =>
            {
                Ok(Self::new(name.to_string()))
            }
            _ => Err(DomainError::validation(
                "permission",
                format!("'{name}' is not of the form resource.action"),
            )),
        }
    }

    /// `resource.action` from parts.
    pub fn of(resource: &str, action: &str) -> Self {
        Self::new(format!("{resource}.{action}"))
    }

    /// The `resource.manage` permission for `resource`.
    pub fn manage_of(resource: &str) -> Self {
        Self::of(resource, MANAGE_ACTION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    pub fn resource(&self) -> Option<&str> {
        self.as_str().split_once('.').map(|(resource, _)| resource)
    }

    pub fn action(&self) -> Option<&str> {
        self.as_str().split_once('.').map(|(_, action)| action)
    }

    pub fn is_manage(&self) -> bool {
        self.action() == Some(MANAGE_ACTION)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
