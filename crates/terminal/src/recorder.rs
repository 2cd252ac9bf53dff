use std::sync::Arc;

use async_trait::async_trait;
use tillpoint_data::{RemoteError, RemoteStore};
use tillpoint_sales::Receipt;

pub const SALES_COLLECTION: &str = "sales";

/// Persists completed sales.
#[async_trait]
pub trait SaleRecorder: Send + Sync {
    async fn record(&self, receipt: &Receipt) -> Result<(), RemoteError>;
}

/// Writes each receipt as one row of the `sales` collection.
pub struct RemoteSaleRecorder {
    store: Arc<dyn RemoteStore>,
}

impl RemoteSaleRecorder {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SaleRecorder for RemoteSaleRecorder {
    async fn record(&self, receipt: &Receipt) -> Result<(), RemoteError> {
        let row = serde_json::to_value(receipt).map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        self.store.create(SALES_COLLECTION, row).await?;
        tracing::info!(receipt_id = %receipt.id, total = %receipt.totals.total, "sale recorded");
        Ok(())
    }
}
