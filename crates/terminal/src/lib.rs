//! The register: a signed-in session building orders against local stock and
//! recording completed sales with the backend.

pub mod config;
pub mod error;
pub mod recorder;
pub mod session;

pub use config::TerminalConfig;
pub use error::{FailureKind, TerminalError};
pub use recorder::{RemoteSaleRecorder, SaleRecorder, SALES_COLLECTION};
pub use session::{CompletedSale, TerminalSession, SELL};
