use thiserror::Error;

use tillpoint_auth::AuthzError;
use tillpoint_data::RemoteError;
use tillpoint_inventory::StockError;
use tillpoint_sales::{CartError, PaymentError};

/// Broad class of a failure, used to pick how it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Validation,
    Remote,
    StockInsufficiency,
    Forbidden,
}

/// Any failure a terminal operation can report.
///
/// None of these are fatal: the session stays usable and the user may retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl TerminalError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TerminalError::Authz(_) => FailureKind::Forbidden,
            TerminalError::Cart(CartError::OutOfStock { .. } | CartError::InsufficientStock { .. }) => {
                FailureKind::StockInsufficiency
            }
            TerminalError::Cart(_) | TerminalError::Payment(_) => FailureKind::Validation,
            TerminalError::Stock(_) => FailureKind::StockInsufficiency,
            TerminalError::Remote(_) => FailureKind::Remote,
        }
    }

    /// Text for the toast shown to the cashier.
    pub fn user_message(&self) -> String {
        match self {
            TerminalError::Authz(AuthzError::Inactive(status)) => {
                format!("This account is {status}. Ask a manager for access.")
            }
            TerminalError::Authz(AuthzError::Forbidden(_)) => {
                "You do not have permission to do that.".to_string()
            }
            TerminalError::Payment(PaymentError::EmptyOrder) => {
                "Add items to the order before taking payment.".to_string()
            }
            TerminalError::Remote(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
