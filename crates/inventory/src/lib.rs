//! Inventory domain module.
//!
//! Ingredients, consignments received from suppliers, and the terminal's
//! session-local stock ledger. Pure domain logic (no IO, no HTTP, no storage).

pub mod consignment;
pub mod ingredient;
pub mod stock;

pub use consignment::{
    validate_consignment, Consignment, ConsignmentDraft, ConsignmentLine, ConsignmentLineDraft,
    ValidConsignment,
};
pub use ingredient::{validate_ingredient, Ingredient, IngredientDraft, ValidIngredient};
pub use stock::{LowStockWarning, StockCounter, StockError, StockLedger, DEFAULT_LOW_STOCK_THRESHOLD};
