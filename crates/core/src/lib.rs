//! `tillpoint-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no transport): typed
//! identifiers, fixed-point money, field validation and the notification seam.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod notify;
pub mod validation;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{ConsignmentId, IngredientId, ProductId, PurchaseOrderId, StaffId, SupplierId};
pub use money::{Money, TaxRate};
pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use validation::{FieldError, ValidationErrors, Validator};
