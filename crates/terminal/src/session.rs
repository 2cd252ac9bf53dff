//! One signed-in staff member working the register.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tillpoint_auth::{Permission, PermissionEvaluator, SessionContext, authorize};
use tillpoint_core::{Notifier, ProductId, Severity};
use tillpoint_inventory::{LowStockWarning, StockLedger};
use tillpoint_navigation::{NavItem, NavigationCatalog};
use tillpoint_products::MenuItem;
use tillpoint_sales::{Cart, LineItem, PaymentRequest, QuantityChange, Receipt, Totals, validate_payment};

use crate::{FailureKind, SaleRecorder, TerminalConfig, TerminalError};

/// Permission every order mutation and checkout requires.
pub const SELL: Permission = Permission::from_static("sales.create");

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSale {
    pub receipt: Receipt,
    pub low_stock: Vec<LowStockWarning>,
}

/// Session context, the order being built, and the stock it draws from.
///
/// Every operation takes `&mut self`, so a checkout cannot overlap another
/// checkout or a cart edit.
pub struct TerminalSession {
    context: SessionContext,
    cart: Cart,
    stock: StockLedger,
    notifier: Arc<dyn Notifier>,
    receipt_prefix: String,
}

impl TerminalSession {
    pub fn new(
        context: SessionContext,
        stock: StockLedger,
        notifier: Arc<dyn Notifier>,
        config: &TerminalConfig,
    ) -> Self {
        tracing::info!(
            staff_id = %context.identity().id,
            role = %context.role(),
            "terminal session started"
        );
        Self {
            context,
            cart: Cart::new(config.tax_rate()),
            stock,
            notifier,
            receipt_prefix: config.receipt_prefix.clone(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> Totals {
        self.cart.totals()
    }

    pub fn stock(&self) -> &StockLedger {
        &self.stock
    }

    /// Stock loading and restocking; not gated, the caller owns inventory.
    pub fn stock_mut(&mut self) -> &mut StockLedger {
        &mut self.stock
    }

    pub fn can(&self, permission: &str) -> bool {
        self.context.has(&Permission::new(permission.to_string()))
    }

    pub fn visible_navigation(&self, catalog: &NavigationCatalog) -> Vec<NavItem> {
        catalog.visible_for(&self.context)
    }

    pub fn add_item(&mut self, item: &MenuItem) -> Result<LineItem, TerminalError> {
        self.require(&SELL)?;
        match self.cart.add_item(item, &self.stock).map(LineItem::clone) {
            Ok(line) => {
                tracing::debug!(product_id = %line.product_id, quantity = line.quantity, "item added");
                Ok(line)
            }
            Err(err) => Err(self.report(err.into())),
        }
    }

    /// Zero or a negative quantity removes the line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<QuantityChange, TerminalError> {
        self.require(&SELL)?;
        self.cart
            .set_quantity(product_id, quantity, &self.stock)
            .map_err(|err| self.report(err.into()))
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> Result<Option<LineItem>, TerminalError> {
        self.require(&SELL)?;
        Ok(self.cart.remove_item(product_id))
    }

    pub fn clear(&mut self) -> Result<(), TerminalError> {
        self.require(&SELL)?;
        self.cart.clear();
        Ok(())
    }

    pub async fn checkout(
        &mut self,
        request: &PaymentRequest,
        recorder: &dyn SaleRecorder,
    ) -> Result<CompletedSale, TerminalError> {
        self.checkout_at(request, recorder, Utc::now()).await
    }

    /// Validate payment, persist the sale, then commit stock and clear the order.
    ///
    /// Nothing local changes unless the recorder accepted the sale.
    pub async fn checkout_at(
        &mut self,
        request: &PaymentRequest,
        recorder: &dyn SaleRecorder,
        now: DateTime<Utc>,
    ) -> Result<CompletedSale, TerminalError> {
        self.require(&SELL)?;

        let payment = validate_payment(&self.cart.totals(), self.cart.lines().len(), request)
            .map_err(|err| self.report(err.into()))?;

        let mut stock_after = self.stock.clone();
        let low_stock = stock_after
            .apply_sale(self.cart.lines().iter().map(|l| (l.product_id, l.quantity)))
            .map_err(|err| self.report(err.into()))?;

        let receipt = Receipt::issue(
            &self.cart,
            payment,
            self.context.identity().id,
            &self.receipt_prefix,
            now,
        );

        if let Err(err) = recorder.record(&receipt).await {
            return Err(self.report(err.into()));
        }

        self.stock = stock_after;
        self.cart.clear();

        tracing::info!(
            receipt_id = %receipt.id,
            total = %receipt.totals.total,
            method = ?receipt.payment.method,
            "checkout completed"
        );
        self.notifier.success(&format!(
            "Sale {} completed. Change: {}",
            receipt.id, receipt.payment.change
        ));
        for warning in &low_stock {
            let name = receipt
                .lines
                .iter()
                .find(|l| l.product_id == warning.product_id)
                .map_or("An item", |l| l.name.as_str());
            self.notifier
                .warning(&format!("Low stock: {name} has {} left", warning.remaining));
        }

        Ok(CompletedSale { receipt, low_stock })
    }

    fn require(&self, permission: &Permission) -> Result<(), TerminalError> {
        authorize(&self.context, permission).map_err(|err| self.report(err.into()))
    }

    /// Surfaces `err` to the user and hands it back for the caller to return.
    fn report(&self, err: TerminalError) -> TerminalError {
        let severity = match err.kind() {
            FailureKind::StockInsufficiency | FailureKind::Validation => Severity::Warning,
            FailureKind::Remote | FailureKind::Forbidden => Severity::Error,
        };
        tracing::warn!(kind = ?err.kind(), error = %err, "terminal operation failed");
        self.notifier.notify(severity, &err.user_message());
        err
    }
}
