use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use stock_ledger::domain::{TransactionCreate, TransactionPatch};
use stock_ledger::query::{SortBy, SortOrder, TransactionColumn, TransactionListRequest};
use stock_ledger::store::MemoryStore;
use stock_ledger::{setup_tracing, InventorySystem, LedgerConfig};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = LedgerConfig::from_env().map_err(|e| e.to_string())?;
    info!("Starting stock ledger demo");

    let store = Arc::new(MemoryStore::new());
    let minuman = store.insert_product_type("Minuman").map_err(|e| e.to_string())?;
    let kopi = store
        .insert_product("Kopi Susu", Decimal::new(18_000, 0), 5, minuman.id)
        .map_err(|e| e.to_string())?;
    info!(product_id = %kopi.id, stock = kopi.stock, "Product seeded");

    let system = InventorySystem::with_store(store, config);
    let client = &system.transaction_client;

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).ok_or("invalid demo date")?;
    let sale = async {
        info!("Recording sale");
        client
            .create_transaction(TransactionCreate::new("Budi", kopi.id, 3, date))
            .await
    }
    .instrument(tracing::info_span!("sale"))
    .await
    .map_err(|e| e.to_string())?;
    info!(transaction_id = %sale.id, total_price = %sale.total_price, "Sale recorded");

    // Only two left, so this one is refused.
    match client
        .create_transaction(TransactionCreate::new("Siti", kopi.id, 3, date))
        .await
    {
        Ok(t) => info!(transaction_id = %t.id, "Unexpected second sale accepted"),
        Err(e) => error!(error = %e, status = e.kind().http_status(), "Second sale rejected"),
    }

    let amended = client
        .update_transaction(sale.id, TransactionPatch::default().amount_sold(4))
        .await
        .map_err(|e| e.to_string())?;
    info!(amount_sold = amended.amount_sold, total_price = %amended.total_price, "Sale amended");

    let page = client
        .list_transactions(TransactionListRequest::default().sort(
            SortBy::Transaction(TransactionColumn::TotalPrice),
            SortOrder::Desc,
        ))
        .await
        .map_err(|e| e.to_string())?;
    for listing in &page.items {
        info!(
            transaction_id = %listing.transaction.id,
            buyer = %listing.transaction.buyer_name,
            product = listing.product_name.as_deref().unwrap_or("-"),
            "Listed"
        );
    }

    client.delete_transaction(sale.id).await.map_err(|e| e.to_string())?;
    info!("Sale deleted, stock restored");

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Demo completed successfully");
    Ok(())
}
