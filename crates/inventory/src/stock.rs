//! Session-local stock counters for the sales terminal.
//!
//! The backend owns durable stock; this ledger is the terminal's working copy,
//! checked by the cart and decremented when a sale completes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tillpoint_core::ProductId;

/// Fallback low-stock threshold for counters created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCounter {
    pub quantity: u32,
    pub low_stock_threshold: u32,
}

impl StockCounter {
    pub fn is_low(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    Insufficient {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// Raised when a sale leaves a product at or below its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockWarning {
    pub product_id: ProductId,
    pub remaining: u32,
    pub threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLedger {
    counters: HashMap<ProductId, StockCounter>,
    default_threshold: u32,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::with_default_threshold(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn with_default_threshold(default_threshold: u32) -> Self {
        Self {
            counters: HashMap::new(),
            default_threshold,
        }
    }

    /// Units on hand; products the ledger has never seen have none.
    pub fn available(&self, product_id: ProductId) -> u32 {
        self.counters
            .get(&product_id)
            .map(|c| c.quantity)
            .unwrap_or(0)
    }

    pub fn counter(&self, product_id: ProductId) -> Option<&StockCounter> {
        self.counters.get(&product_id)
    }

    pub fn set(&mut self, product_id: ProductId, quantity: u32, low_stock_threshold: u32) {
        self.counters.insert(
            product_id,
            StockCounter {
                quantity,
                low_stock_threshold,
            },
        );
    }

    /// Sets quantity, keeping an existing threshold or using the default.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        let threshold = self.default_threshold;
        self.counters
            .entry(product_id)
            .and_modify(|c| c.quantity = quantity)
            .or_insert(StockCounter {
                quantity,
                low_stock_threshold: threshold,
            });
    }

    pub fn restock(&mut self, product_id: ProductId, quantity: u32) {
        let threshold = self.default_threshold;
        let counter = self.counters.entry(product_id).or_insert(StockCounter {
            quantity: 0,
            low_stock_threshold: threshold,
        });
        counter.quantity = counter.quantity.saturating_add(quantity);
    }

    /// Products currently at or below their threshold.
    pub fn low_stock(&self) -> Vec<LowStockWarning> {
        let mut out: Vec<LowStockWarning> = self
            .counters
            .iter()
            .filter(|(_, c)| c.is_low())
            .map(|(id, c)| LowStockWarning {
                product_id: *id,
                remaining: c.quantity,
                threshold: c.low_stock_threshold,
            })
            .collect();
        out.sort_by_key(|w| w.product_id);
        out
    }

    /// Decrement every sold product.
    ///
    /// All quantities are checked before anything changes, so a failed sale
    /// leaves the ledger untouched. Returns a warning for each sold product
    /// that ends at or below its threshold, in the order first sold.
    pub fn apply_sale<I>(&mut self, sold: I) -> Result<Vec<LowStockWarning>, StockError>
    where
        I: IntoIterator<Item = (ProductId, u32)>,
    {
        let mut order = Vec::new();
        let mut totals: BTreeMap<ProductId, u32> = BTreeMap::new();
        for (product_id, quantity) in sold {
            let entry = totals.entry(product_id).or_insert_with(|| {
                order.push(product_id);
                0
            });
            *entry = entry.saturating_add(quantity);
        }

        for product_id in &order {
            let requested = totals[product_id];
            let available = self.available(*product_id);
            if requested > available {
                return Err(StockError::Insufficient {
                    product_id: *product_id,
                    requested,
                    available,
                });
            }
        }

        let mut warnings = Vec::new();
        for product_id in order {
            let Some(counter) = self.counters.get_mut(&product_id) else {
                continue;
            };
            counter.quantity -= totals[&product_id];
            if counter.is_low() {
                tracing::warn!(
                    %product_id,
                    remaining = counter.quantity,
                    threshold = counter.low_stock_threshold,
                    "low stock"
                );
                warnings.push(LowStockWarning {
                    product_id,
                    remaining: counter.quantity,
                    threshold: counter.low_stock_threshold,
                });
            }
        }

        Ok(warnings)
    }
}

impl Default for StockLedger {
    fn default() -> Self {
        Self::new()
    }
}
