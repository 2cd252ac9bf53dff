//! The terminal's in-progress order.
//!
//! Every mutation recomputes the order totals from the current lines; nothing
//! is patched incrementally. Tax applies to the order subtotal, not per line.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tillpoint_core::{Money, ProductId, TaxRate};
use tillpoint_inventory::StockLedger;
use tillpoint_products::MenuItem;

/// Order line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// `unit_price × quantity`.
    pub subtotal: Money,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("{name} is out of stock")]
    OutOfStock { product_id: ProductId, name: String },

    #[error("only {available} {name} left in stock")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("{name} is not available for sale")]
    Unavailable { product_id: ProductId, name: String },

    #[error("product {0} is not in the order")]
    NotInCart(ProductId),

    #[error("adding {name} would push the order total past the largest amount the terminal can record")]
    TotalTooLarge { product_id: ProductId, name: String },
}

/// Result of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Updated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
    tax_rate: TaxRate,
    totals: Totals,
}

impl Cart {
    pub fn new(tax_rate: TaxRate) -> Self {
        Self {
            lines: Vec::new(),
            tax_rate,
            totals: Totals::default(),
        }
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Add one unit of `product`, inserting a new line or bumping an existing one.
    pub fn add_item(&mut self, product: &MenuItem, stock: &StockLedger) -> Result<&LineItem, CartError> {
        if !product.available {
            return Err(CartError::Unavailable {
                product_id: product.id,
                name: product.name.clone(),
            });
        }

        let available = stock.available(product.id);
        if available == 0 {
            return Err(CartError::OutOfStock {
                product_id: product.id,
                name: product.name.clone(),
            });
        }

        let mut lines = self.lines.clone();
        let index = match self.position(product.id) {
            Some(index) => {
                let requested = lines[index].quantity.saturating_add(1);
                if requested > available {
                    return Err(CartError::InsufficientStock {
                        product_id: product.id,
                        name: product.name.clone(),
                        requested,
                        available,
                    });
                }
                lines[index].quantity = requested;
                index
            }
            None => {
                lines.push(LineItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity: 1,
                    subtotal: product.price,
                });
                lines.len() - 1
            }
        };

        self.commit(lines, product.id, &product.name)?;
        Ok(&self.lines[index])
    }

    /// Replace a line's quantity. Zero or less removes the line.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        stock: &StockLedger,
    ) -> Result<QuantityChange, CartError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(QuantityChange::Removed);
        }

        let index = self
            .position(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        let available = stock.available(product_id);
        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        if requested > available {
            return Err(CartError::InsufficientStock {
                product_id,
                name: self.lines[index].name.clone(),
                requested,
                available,
            });
        }

        let mut lines = self.lines.clone();
        lines[index].quantity = requested;
        let name = lines[index].name.clone();
        self.commit(lines, product_id, &name)?;
        Ok(QuantityChange::Updated)
    }

    /// Drop the line for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<LineItem> {
        let removed = self
            .position(product_id)
            .map(|index| self.lines.remove(index));
        self.recompute();
        removed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.recompute();
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    /// Replaces the lines if their totals fit in `Money`; otherwise nothing changes.
    fn commit(&mut self, mut lines: Vec<LineItem>, product_id: ProductId, name: &str) -> Result<(), CartError> {
        let totals = price_lines(&mut lines, self.tax_rate).ok_or_else(|| CartError::TotalTooLarge {
            product_id,
            name: name.to_string(),
        })?;
        self.lines = lines;
        self.totals = totals;
        tracing::debug!(
            lines = self.lines.len(),
            subtotal = %totals.subtotal,
            total = %totals.total,
            "order totals recomputed"
        );
        Ok(())
    }

    /// After removals; totals only shrink.
    fn recompute(&mut self) {
        for line in &mut self.lines {
            line.subtotal = line.unit_price.times(line.quantity);
        }
        let subtotal: Money = self.lines.iter().map(|l| l.subtotal).sum();
        let tax = self.tax_rate.apply(subtotal);
        self.totals = Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        };
    }
}

/// Line subtotals and order totals, or `None` on overflow.
fn price_lines(lines: &mut [LineItem], tax_rate: TaxRate) -> Option<Totals> {
    let mut subtotal = Money::ZERO;
    for line in lines.iter_mut() {
        line.subtotal = line.unit_price.checked_times(line.quantity)?;
        subtotal = subtotal.checked_add(line.subtotal)?;
    }
    let tax = tax_rate.apply(subtotal);
    Some(Totals {
        subtotal,
        tax,
        total: subtotal.checked_add(tax)?,
    })
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(TaxRate::STANDARD)
    }
}
