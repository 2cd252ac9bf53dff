use serde::{Deserialize, Serialize};

use tillpoint_auth::Permission;

/// One sidebar entry; sub-items are one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub path: String,
    pub permission: Permission,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn new(name: &str, path: &str, permission: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            permission: Permission::new(permission.to_string()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NavItem>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
