use serde::Serialize;
use serde::de::DeserializeOwned;
use tillpoint_auth::StaffMember;
use tillpoint_core::Entity;
use tillpoint_inventory::{Consignment, Ingredient};
use tillpoint_products::MenuItem;
use tillpoint_purchasing::{PurchaseOrder, Supplier};

/// An entity stored in a named remote collection.
pub trait Record: Entity + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
}

impl Record for MenuItem {
    const COLLECTION: &'static str = "menu_items";
}

impl Record for Ingredient {
    const COLLECTION: &'static str = "ingredients";
}

impl Record for Consignment {
    const COLLECTION: &'static str = "consignments";
}

impl Record for Supplier {
    const COLLECTION: &'static str = "suppliers";
}

impl Record for PurchaseOrder {
    const COLLECTION: &'static str = "purchase_orders";
}

impl Record for StaffMember {
    const COLLECTION: &'static str = "staff";
}
