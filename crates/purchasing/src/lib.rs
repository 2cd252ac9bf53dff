//! Purchasing domain module: suppliers and purchase orders.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod supplier;

pub use order::{PurchaseLine, PurchaseOrder, PurchaseOrderStatus};
pub use supplier::{validate_supplier, Supplier, SupplierDraft, ValidSupplier};
