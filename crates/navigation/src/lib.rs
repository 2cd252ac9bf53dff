//! Sidebar navigation: role-specific menu trees and permission filtering.

pub mod catalog;
pub mod filter;
pub mod item;
pub mod menu_state;

pub use catalog::NavigationCatalog;
pub use filter::filter_navigation;
pub use item::NavItem;
pub use menu_state::MenuExpansion;
