//! Staff records and the staff form.

use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, StaffId, ValidationErrors, Validator};

use crate::{Identity, IdentityStatus, Permission, Role, RolePolicy};

/// A staff account as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: IdentityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

impl StaffMember {
    pub fn new(id: StaffId, valid: ValidStaff) -> Self {
        Self {
            id,
            name: valid.name,
            email: valid.email,
            role: valid.role,
            status: IdentityStatus::Active,
            permissions: valid.permissions,
        }
    }

    /// The identity this account signs in as.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            role: self.role.clone(),
            permissions: self.permissions.clone(),
            status: self.status,
        }
    }
}

impl Entity for StaffMember {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Raw staff form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    /// Explicit permission override; `None` means "use role defaults".
    pub permissions: Option<Vec<String>>,
}

/// Staff form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStaff {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Option<Vec<Permission>>,
}

/// Validate a staff form against the roles `policy` knows.
pub fn validate_staff(draft: &StaffDraft, policy: &RolePolicy) -> Result<ValidStaff, ValidationErrors> {
    let mut v = Validator::new();

    let name = v.required("name", &draft.name);
    v.max_len("name", &draft.name, 80);
    v.email("email", &draft.email);

    let role = v.required("role", &draft.role).map(Role::new);
    if let Some(role) = &role {
        v.check(policy.knows_role(role), "role", format!("unknown role '{role}'"));
    }

    let mut permissions = None;
    if let Some(names) = &draft.permissions {
        let mut parsed = Vec::with_capacity(names.len());
        for name in names {
            match Permission::parse(name) {
                Ok(p) => parsed.push(p),
                Err(_) => v.push("permissions", format!("'{name}' is not of the form resource.action")),
            }
        }
        permissions = Some(parsed);
    }

    v.finish(|| ValidStaff {
        name: name.unwrap_or_default(),
        email: draft.email.trim().to_ascii_lowercase(),
        role: role.unwrap_or_else(|| Role::new("")),
        permissions,
    })
}
