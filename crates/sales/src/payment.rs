//! Payment collection and change calculation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tillpoint_core::{Money, ValidationErrors};

use crate::cart::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    EWallet,
}

impl PaymentMethod {
    /// Only cash involves a tendered amount and change.
    pub fn takes_tender(self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::EWallet => write!(f, "e-wallet"),
        }
    }
}

/// What the cashier entered on the payment screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    /// Amount handed over; required for cash, ignored otherwise.
    #[serde(default)]
    pub tendered: Option<Money>,
    /// Card slip / e-wallet transaction reference.
    #[serde(default)]
    pub reference: Option<String>,
}

impl PaymentRequest {
    pub fn cash(tendered: Money) -> Self {
        Self {
            method: PaymentMethod::Cash,
            tendered: Some(tendered),
            reference: None,
        }
    }

    pub fn card(reference: Option<String>) -> Self {
        Self {
            method: PaymentMethod::Card,
            tendered: None,
            reference,
        }
    }

    pub fn e_wallet(reference: Option<String>) -> Self {
        Self {
            method: PaymentMethod::EWallet,
            tendered: None,
            reference,
        }
    }
}

/// A payment that covers the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedPayment {
    pub method: PaymentMethod,
    pub amount_due: Money,
    pub tendered: Money,
    pub change: Money,
    pub reference: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("the order is empty")]
    EmptyOrder,

    #[error("{0}")]
    Invalid(ValidationErrors),
}

/// `max(0, tendered - total)`.
pub fn compute_change(total: Money, tendered: Money) -> Money {
    tendered.saturating_sub_floor_zero(total)
}

/// Check `request` against the order totals.
///
/// Cash must cover the total; other methods are charged the exact total.
pub fn validate_payment(
    totals: &Totals,
    line_count: usize,
    request: &PaymentRequest,
) -> Result<ValidatedPayment, PaymentError> {
    if line_count == 0 || !totals.total.is_positive() {
        return Err(PaymentError::EmptyOrder);
    }

    let reference = request
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    if !request.method.takes_tender() {
        return Ok(ValidatedPayment {
            method: request.method,
            amount_due: totals.total,
            tendered: totals.total,
            change: Money::ZERO,
            reference,
        });
    }

    let tendered = request.tendered.ok_or_else(|| {
        PaymentError::Invalid(ValidationErrors::single("tendered", "enter the amount received"))
    })?;

    if tendered < totals.total {
        return Err(PaymentError::Invalid(ValidationErrors::single(
            "tendered",
            format!(
                "amount received ({tendered}) is less than the total ({})",
                totals.total
            ),
        )));
    }

    Ok(ValidatedPayment {
        method: request.method,
        amount_due: totals.total,
        tendered,
        change: compute_change(totals.total, tendered),
        reference,
    })
}
