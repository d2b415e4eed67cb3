//! Transaction manager: creates, amends and removes sales against the stock
//! ledger so that, per product, the `amount_sold` of live transactions always
//! adds up to the stock taken out.
//!
//! Each mutating operation is one unit. Its reads and writes happen while the
//! ledger holds the locks of every product involved, and when a later write
//! fails the earlier ones are undone in reverse order. A unit whose undo also
//! fails reports [`InventoryError::RollbackFailed`].

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LedgerConfig;
use crate::domain::{
    NewTransaction, Product, ProductId, Transaction, TransactionCreate, TransactionId,
    TransactionListing, TransactionPatch,
};
use crate::error::{InventoryError, Result};
use crate::ledger::{StockLedger, StockUnit};
use crate::query::{Paginated, TransactionListRequest, TransactionQuery};
use crate::store::InventoryStore;

pub struct TransactionManager {
    store: Arc<dyn InventoryStore>,
    ledger: StockLedger,
    default_page_limit: u32,
}

impl TransactionManager {
    pub fn new(store: Arc<dyn InventoryStore>, config: &LedgerConfig) -> Self {
        Self {
            ledger: StockLedger::new(Arc::clone(&store)),
            store,
            default_page_limit: config.default_page_limit,
        }
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    /// Record a sale and take its amount out of the product's stock.
    #[instrument(
        skip(self, params),
        fields(product_id = %params.product_id, amount_sold = params.amount_sold)
    )]
    pub async fn create_transaction(&self, params: TransactionCreate) -> Result<Transaction> {
        ensure_positive(params.amount_sold)?;
        let product_id = params.product_id;
        let unit = self.ledger.lock(&[product_id]).await;

        let product = unit.product(product_id).await?;
        let total_price = total_price(&product, params.amount_sold)?;
        StockLedger::ensure_available(&product, params.amount_sold)?;

        let record = self
            .store
            .create_transaction_record(NewTransaction {
                buyer_name: params.buyer_name,
                product_id,
                amount_sold: params.amount_sold,
                total_price,
                transaction_date: params.transaction_date,
            })
            .await?;

        match unit.reserve(product_id, record.amount_sold).await {
            Ok(remaining) => {
                info!(transaction_id = %record.id, remaining_stock = remaining, "Transaction created");
                Ok(record)
            }
            Err(e) => Err(roll_back(e, async {
                self.store.delete_transaction_record(record.id).await?;
                Ok::<(), InventoryError>(())
            })
            .await),
        }
    }

    /// Apply `patch` to a transaction, re-validating stock as if the old
    /// amount had never been taken.
    ///
    /// When the patch moves the sale to another product, the old product gets
    /// its amount back and the new product must cover the new amount.
    #[instrument(skip(self, id, patch), fields(transaction_id = %id))]
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        if let Some(amount) = patch.amount_sold {
            ensure_positive(amount)?;
        }

        loop {
            let seen = self.find(id).await?;
            let target_id = patch.product_id.unwrap_or(seen.product_id);
            let unit = self.ledger.lock(&[seen.product_id, target_id]).await;

            let current = self.find(id).await?;
            if current.product_id != seen.product_id {
                debug!("Transaction changed product while waiting for the lock, retrying");
                continue;
            }
            return self.apply_update(&unit, current, target_id, &patch).await;
        }
    }

    async fn apply_update(
        &self,
        unit: &StockUnit<'_>,
        old: Transaction,
        target_id: ProductId,
        patch: &TransactionPatch,
    ) -> Result<Transaction> {
        let amount_sold = patch.amount_sold.unwrap_or(old.amount_sold);
        let product = unit.product(target_id).await?;
        let moved = target_id != old.product_id;

        // Stock of the target product as if `old` had never been applied.
        let available = if moved {
            product.stock
        } else {
            product.stock.checked_add(old.amount_sold).ok_or_else(|| {
                InventoryError::Validation(format!("stock of product {target_id} would overflow"))
            })?
        };
        if available < amount_sold {
            warn!(product_id = %target_id, available, requested = amount_sold, "Insufficient stock");
            return Err(InventoryError::InsufficientStock {
                product_id: target_id,
                requested: amount_sold,
                available,
            });
        }

        let updated = Transaction {
            buyer_name: patch
                .buyer_name
                .clone()
                .unwrap_or_else(|| old.buyer_name.clone()),
            product_id: target_id,
            amount_sold,
            total_price: total_price(&product, amount_sold)?,
            transaction_date: patch.transaction_date.unwrap_or(old.transaction_date),
            updated_at: Utc::now(),
            ..old.clone()
        };
        if !self.store.update_transaction_record(&updated).await? {
            return Err(InventoryError::TransactionNotFound(old.id));
        }

        if moved {
            if let Err(e) = unit.reserve(target_id, amount_sold).await {
                return Err(roll_back(e, self.restore(&old)).await);
            }
            match unit.release(old.product_id, old.amount_sold).await {
                Ok(_) => {}
                Err(InventoryError::ProductNotFound(gone)) => {
                    // Removed outside the ledger, so there is no stock to give back.
                    warn!(product_id = %gone, amount_sold = old.amount_sold, "Previous product is gone, amount not returned");
                }
                Err(e) => {
                    return Err(roll_back(e, async {
                        unit.release(target_id, amount_sold).await?;
                        self.restore(&old).await
                    })
                    .await);
                }
            }
            info!(from_product = %old.product_id, to_product = %target_id, "Transaction moved to another product");
        } else {
            let delta = i64::from(old.amount_sold) - i64::from(amount_sold);
            match unit.adjust(target_id, delta).await {
                Ok(stock) => info!(remaining_stock = stock, "Transaction updated"),
                Err(e) => return Err(roll_back(e, self.restore(&old)).await),
            }
        }

        Ok(updated)
    }

    /// Write `old` back over its own row.
    async fn restore(&self, old: &Transaction) -> Result<()> {
        self.store.update_transaction_record(old).await?;
        Ok(())
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.find(id).await
    }

    #[instrument(skip(self, request))]
    pub async fn list_transactions(
        &self,
        request: TransactionListRequest,
    ) -> Result<Paginated<TransactionListing>> {
        let query = TransactionQuery::build(&request, self.default_page_limit);
        let total = self.store.count_transactions(&query.filter).await?;
        let items = self.store.list_transactions_with_product(&query).await?;
        debug!(total, results = items.len(), page = query.pagination.page, "Listed transactions");
        Ok(Paginated::new(items, total, query.pagination))
    }

    /// Hard-delete a transaction and give its amount back to the product.
    #[instrument(skip(self, id), fields(transaction_id = %id))]
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        loop {
            let seen = self.find(id).await?;
            let unit = self.ledger.lock(&[seen.product_id]).await;

            let current = self.find(id).await?;
            if current.product_id != seen.product_id {
                debug!("Transaction changed product while waiting for the lock, retrying");
                continue;
            }
            return self.remove(&unit, current).await;
        }
    }

    async fn remove(&self, unit: &StockUnit<'_>, transaction: Transaction) -> Result<()> {
        if !self.store.delete_transaction_record(transaction.id).await? {
            return Err(InventoryError::TransactionNotFound(transaction.id));
        }

        match unit.release(transaction.product_id, transaction.amount_sold).await {
            Ok(stock) => {
                info!(product_id = %transaction.product_id, restored_stock = stock, "Transaction deleted");
                Ok(())
            }
            Err(e) => Err(roll_back(e, async {
                self.store.restore_transaction_record(&transaction).await?;
                Ok::<(), InventoryError>(())
            })
            .await),
        }
    }

    async fn find(&self, id: TransactionId) -> Result<Transaction> {
        self.store
            .get_transaction_by_id(id)
            .await?
            .ok_or(InventoryError::TransactionNotFound(id))
    }
}

fn ensure_positive(amount_sold: u32) -> Result<()> {
    if amount_sold == 0 {
        return Err(InventoryError::Validation(
            "amountSold must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn total_price(product: &Product, amount_sold: u32) -> Result<Decimal> {
    product.price_for(amount_sold).ok_or_else(|| {
        InventoryError::Validation(format!(
            "total price of {amount_sold} x product {} overflows",
            product.id
        ))
    })
}

/// Run `undo` after `cause` broke a unit. Returns `cause` if the undo worked.
async fn roll_back<F>(cause: InventoryError, undo: F) -> InventoryError
where
    F: Future<Output = Result<()>>,
{
    match undo.await {
        Ok(()) => {
            warn!(error = %cause, "Unit rolled back");
            cause
        }
        Err(rollback) => {
            error!(error = %cause, rollback_error = %rollback, "Rollback failed, store may be inconsistent");
            InventoryError::RollbackFailed {
                cause: Box::new(cause),
                rollback: Box::new(rollback),
            }
        }
    }
}
