use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tillpoint_core::StaffId;

use crate::cart::{Cart, LineItem, Totals};
use crate::payment::ValidatedPayment;

/// Default receipt number prefix.
pub const DEFAULT_RECEIPT_PREFIX: &str = "RCP";

/// Human-facing receipt number: `PREFIX-YYYYMMDD-HHMMSS-XXXXXX`.
///
/// Printed on the slip; not an idempotency key. The suffix is random, so
/// two receipts issued in the same second can collide (1 in 16^6).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    pub fn generate(prefix: &str, now: DateTime<Utc>) -> Self {
        let random = Uuid::now_v7().simple().to_string();
        let suffix = &random[random.len() - 6..];
        Self(format!(
            "{}-{}-{}",
            prefix,
            now.format("%Y%m%d-%H%M%S"),
            suffix.to_ascii_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub cashier: StaffId,
    pub issued_at: DateTime<Utc>,
    pub lines: Vec<LineItem>,
    pub totals: Totals,
    pub payment: ValidatedPayment,
}

impl Receipt {
    /// Snapshot the order and payment.
    pub fn issue(
        cart: &Cart,
        payment: ValidatedPayment,
        cashier: StaffId,
        prefix: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReceiptId::generate(prefix, now),
            cashier,
            issued_at: now,
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
            payment,
        }
    }
}
