//! Static per-role navigation trees.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tillpoint_auth::{Role, SessionContext};

use crate::{filter_navigation, NavItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCatalog {
    /// Tree for roles without a dedicated entry.
    default: Vec<NavItem>,
    /// Keyed by lower-cased role name.
    #[serde(default)]
    by_role: HashMap<String, Vec<NavItem>>,
}

impl NavigationCatalog {
    pub fn new(default: Vec<NavItem>) -> Self {
        Self {
            default,
            by_role: HashMap::new(),
        }
    }

    pub fn with_role_tree(mut self, role: &str, tree: Vec<NavItem>) -> Self {
        self.by_role.insert(Role::new(role.to_string()).key(), tree);
        self
    }

    /// Back-office sidebar plus the reduced supplier portal.
    pub fn builtin() -> Self {
        let back_office = vec![
            NavItem::new("Dashboard", "/dashboard", "dashboard.view"),
            NavItem::new("Point of Sale", "/pos", "sales.create"),
            NavItem::new("Menu", "/menu", "menu.view"),
            NavItem::new("Inventory", "/inventory", "inventory.view").with_children([
                NavItem::new("Ingredients", "/inventory/ingredients", "inventory.view"),
                NavItem::new("Consignments", "/inventory/consignments", "consignments.view"),
                NavItem::new("Stock Alerts", "/inventory/alerts", "inventory.view"),
            ]),
            NavItem::new("Purchasing", "/purchasing", "purchases.view").with_children([
                NavItem::new("Suppliers", "/purchasing/suppliers", "suppliers.view"),
                NavItem::new("Purchase Orders", "/purchasing/orders", "purchases.view"),
            ]),
            NavItem::new("Sales", "/sales", "sales.view").with_children([
                NavItem::new("Transactions", "/sales/transactions", "sales.view"),
                NavItem::new("Reports", "/sales/reports", "reports.view"),
            ]),
            NavItem::new("Staff", "/staff", "staff.view").with_children([
                NavItem::new("Accounts", "/staff/accounts", "staff.view"),
                NavItem::new("Roles & Permissions", "/staff/roles", "staff.manage"),
            ]),
            NavItem::new("Settings", "/settings", "settings.manage"),
        ];

        let supplier_portal = vec![
            NavItem::new("Dashboard", "/supplier", "dashboard.view"),
            NavItem::new("Consignments", "/supplier/consignments", "consignments.view"),
            NavItem::new("Purchase Orders", "/supplier/purchase-orders", "purchases.view"),
        ];

        Self::new(back_office).with_role_tree("Supplier", supplier_portal)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Unfiltered tree for `role`.
    pub fn tree_for(&self, role: &Role) -> &[NavItem] {
        self.by_role
            .get(&role.key())
            .map(Vec::as_slice)
            .unwrap_or(&self.default)
    }

    /// Sidebar items the session may see.
    pub fn visible_for(&self, session: &SessionContext) -> Vec<NavItem> {
        let visible = filter_navigation(self.tree_for(session.role()), session);
        tracing::debug!(role = %session.role(), items = visible.len(), "navigation filtered");
        visible
    }
}

impl Default for NavigationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
