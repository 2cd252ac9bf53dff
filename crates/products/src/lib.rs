//! Products domain module: the menu items sold at the terminal.

pub mod menu_item;

pub use menu_item::{validate_menu_item, MenuCategory, MAX_MENU_PRICE, MenuItem, MenuItemDraft, StoredImage, ValidMenuItem};
