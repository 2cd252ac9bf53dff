//! Sales domain module: the terminal's order, payments and receipts.
//!
//! Pure, deterministic domain logic (no IO, no HTTP, no storage).

pub mod cart;
pub mod payment;
pub mod receipt;

pub use cart::{Cart, CartError, LineItem, QuantityChange, Totals};
pub use payment::{
    compute_change, validate_payment, PaymentError, PaymentMethod, PaymentRequest, ValidatedPayment,
};
pub use receipt::{Receipt, ReceiptId, DEFAULT_RECEIPT_PREFIX};
