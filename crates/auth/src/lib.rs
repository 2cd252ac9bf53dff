//! `tillpoint-auth`: pure authorization boundary.
//!
//! Role tables, identities and the permission evaluator. This crate is
//! intentionally decoupled from transport and storage.

pub mod authorize;
pub mod identity;
pub mod login;
pub mod permissions;
pub mod policy;
pub mod roles;
pub mod session;
pub mod staff;

pub use authorize::{authorize, explain_authorization, AuthorizationExplanation, AuthzError};
pub use identity::{Identity, IdentityStatus};
pub use login::{validate_login, Credentials, LoginForm};
pub use permissions::Permission;
pub use policy::{PolicyError, RolePolicy};
pub use roles::Role;
pub use session::{GrantSource, PermissionEvaluator, SessionContext};
pub use staff::{validate_staff, StaffDraft, StaffMember, ValidStaff};
