//! Headless register: signs in the demo cashier, rings up a sale and prints
//! the receipt as JSON.

use std::sync::Arc;

use anyhow::Context;
use tillpoint_auth::{Identity, RolePolicy, SessionContext};
use tillpoint_core::{Money, ProductId, StaffId, TracingNotifier};
use tillpoint_inventory::StockLedger;
use tillpoint_navigation::NavigationCatalog;
use tillpoint_products::{MenuItem, MenuItemDraft, StoredImage, validate_menu_item};
use tillpoint_sales::PaymentRequest;
use tillpoint_terminal::{RemoteSaleRecorder, TerminalConfig, TerminalSession};

const PLACEHOLDER_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

fn menu_item(name: &str, category: &str, price: &str) -> anyhow::Result<MenuItem> {
    let draft = MenuItemDraft {
        name: name.to_string(),
        category: category.to_string(),
        price: price.to_string(),
        available: true,
    };
    let valid = validate_menu_item(&draft).map_err(|e| anyhow::anyhow!("{name}: {e}"))?;
    Ok(MenuItem::new(ProductId::new(), valid))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tillpoint_observability::init();

    let config = TerminalConfig::from_env().context("invalid terminal configuration")?;
    let store = config.remote_store()?;
    let files = config.file_store()?;

    let policy = RolePolicy::builtin();
    let context = SessionContext::establish(Identity::new(StaffId::new(), "Cashier"), &policy)
        .context("cashier could not sign in")?;

    let mut adobo = menu_item("Chicken Adobo", "meal", "120.00")?;
    let uploaded = files
        .upload(&format!("menu/{}/photo.png", adobo.id), PLACEHOLDER_PNG.to_vec(), "image/png")
        .await
        .map_err(|e| anyhow::anyhow!("image upload failed: {}", e.user_message()))?;
    adobo.replace_image(StoredImage {
        url: uploaded.url,
        path: uploaded.path,
    });
    let juice = menu_item("Calamansi Juice", "drink", "85.00")?;

    let mut stock = StockLedger::with_default_threshold(config.default_low_stock_threshold);
    stock.set_quantity(adobo.id, 12);
    stock.set_quantity(juice.id, 30);

    let mut session = TerminalSession::new(context, stock, Arc::new(TracingNotifier), &config);
    for item in session.visible_navigation(&NavigationCatalog::builtin()) {
        tracing::info!(menu = %item.name, path = %item.path, "navigation entry");
    }

    session.add_item(&adobo)?;
    session.add_item(&adobo)?;
    session.add_item(&juice)?;

    let totals = session.totals();
    tracing::info!(subtotal = %totals.subtotal, tax = %totals.tax, total = %totals.total, "order ready");

    let tendered = Money::from_major(400);
    let sale = session
        .checkout(&PaymentRequest::cash(tendered), &RemoteSaleRecorder::new(store))
        .await?;

    println!("{}", serde_json::to_string_pretty(&sale.receipt)?);
    Ok(())
}
