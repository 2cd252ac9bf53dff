use serde::Serialize;
use thiserror::Error;

use tillpoint_core::StaffId;

use crate::session::{GrantSource, PermissionEvaluator, SessionContext};
use crate::{IdentityStatus, Permission, RolePolicy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("account is {0}")]
    Inactive(IdentityStatus),

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Gate an operation on `required`.
///
/// - No IO
/// - No panics
/// - Denials are logged, grants are not
pub fn authorize(session: &SessionContext, required: &Permission) -> Result<(), AuthzError> {
    if session.has(required) {
        Ok(())
    } else {
        tracing::info!(
            staff_id = %session.identity().id,
            role = %session.role(),
            permission = %required,
            "permission denied"
        );
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Why a check was granted or denied.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub staff_id: StaffId,
    pub role: String,
    /// The grant that matched (`sales.create`, `sales.manage`, `*`).
    pub matched_by: Option<String>,
    pub effective_permissions: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Explain a permission decision for `session`.
///
/// `policy` is only consulted to suggest roles that would grant a denied
/// permission.
pub fn explain_authorization(
    session: &SessionContext,
    required: &Permission,
    policy: &RolePolicy,
) -> AuthorizationExplanation {
    let identity = session.identity();
    let effective_permissions: Vec<String> = session
        .granted()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();

    let base = AuthorizationExplanation {
        required_permission: required.as_str().to_string(),
        granted: false,
        reason: String::new(),
        staff_id: identity.id,
        role: identity.role.as_str().to_string(),
        matched_by: None,
        effective_permissions,
        suggestions: Vec::new(),
    };

    if session.is_admin() {
        return AuthorizationExplanation {
            granted: true,
            reason: format!("Role '{}' is an administrator", identity.role),
            ..base
        };
    }

    if let Some(grant) = session.matching_grant(required) {
        let origin = match session.source() {
            GrantSource::Explicit => "explicit permission list",
            _ => "role defaults",
        };
        return AuthorizationExplanation {
            granted: true,
            reason: format!("'{}' granted by '{}' from {}", required, grant, origin),
            matched_by: Some(grant.as_str().to_string()),
            ..base
        };
    }

    let mut suggestions = Vec::new();
    let granting_roles: Vec<&str> = policy
        .role_names()
        .filter(|name| policy.role_grants(&crate::Role::new(name.to_string()), required))
        .collect();
    if !granting_roles.is_empty() {
        suggestions.push(format!(
            "Roles granting '{}' by default: {}",
            required,
            granting_roles.join(", ")
        ));
    }
    if session.source() == GrantSource::Explicit {
        suggestions.push(
            "This account has an explicit permission list; role defaults are ignored".to_string(),
        );
    }
    if let Some(resource) = required.resource() {
        suggestions.push(format!(
            "Grant '{}' or '{}'",
            required,
            Permission::manage_of(resource)
        ));
    }

    AuthorizationExplanation {
        reason: format!("'{}' is not in the effective permission set", required),
        suggestions,
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identity;

    fn cashier() -> SessionContext {
        SessionContext::establish(Identity::new(StaffId::new(), "Cashier"), &RolePolicy::builtin())
            .unwrap()
    }

    #[test]
    fn authorize_returns_forbidden_with_permission_name() {
        let err = authorize(&cashier(), &"staff.delete".into()).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("staff.delete".to_string()));
        assert!(authorize(&cashier(), &"sales.create".into()).is_ok());
    }

    #[test]
    fn explanation_names_matching_grant() {
        let policy = RolePolicy::builtin();
        let manager = SessionContext::establish(Identity::new(StaffId::new(), "Manager"), &policy).unwrap();
        let e = explain_authorization(&manager, &"inventory.delete".into(), &policy);
        assert!(e.granted);
        assert_eq!(e.matched_by.as_deref(), Some("inventory.manage"));
    }

    #[test]
    fn denial_suggests_granting_roles() {
        let policy = RolePolicy::builtin();
        let e = explain_authorization(&cashier(), &"suppliers.view".into(), &policy);
        assert!(!e.granted);
        assert!(e.suggestions[0].contains("inventory"));
        assert!(e.suggestions[0].contains("manager"));
    }
}
