use serde::{Deserialize, Serialize};

use tillpoint_core::StaffId;

use crate::{Permission, Role};

/// Account status as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityStatus {
    /// Can sign in and transact.
    #[default]
    Active,
    /// Deactivated account (left the business).
    Inactive,
    /// Temporarily blocked.
    Suspended,
}

impl core::fmt::Display for IdentityStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IdentityStatus::Active => write!(f, "active"),
            IdentityStatus::Inactive => write!(f, "inactive"),
            IdentityStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Authenticated identity, read-only at this layer.
///
/// When `permissions` is present it replaces the role defaults entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: StaffId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    #[serde(default)]
    pub status: IdentityStatus,
}

impl Identity {
    pub fn new(id: StaffId, role: impl Into<Role>) -> Self {
        Self {
            id,
            role: role.into(),
            permissions: None,
            status: IdentityStatus::Active,
        }
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_status(mut self, status: IdentityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == IdentityStatus::Active
    }
}
