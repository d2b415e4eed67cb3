//! Stock ledger: the single place that decides whether there is enough stock
//! and the only writer of a product's stock column.
//!
//! Check-then-apply happens under a per-product lock. Callers that need
//! several reads and writes to stay consistent (the transaction manager)
//! take a [`StockUnit`] with [`StockLedger::lock`] and keep it for the whole
//! unit; the one-shot [`StockLedger::reserve`], [`StockLedger::release`] and
//! [`StockLedger::adjust`] lock around a single operation.

mod locks;
mod unit;

use std::sync::Arc;

use tracing::warn;

use crate::domain::{Product, ProductId};
use crate::error::{InventoryError, Result};
use crate::store::InventoryStore;

pub use locks::{ProductGuards, ProductLocks};
pub use unit::StockUnit;

pub struct StockLedger {
    store: Arc<dyn InventoryStore>,
    locks: ProductLocks,
}

impl StockLedger {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            locks: ProductLocks::new(),
        }
    }

    /// `InsufficientStock` unless `product` has at least `amount` in stock.
    pub fn ensure_available(product: &Product, amount: u32) -> Result<()> {
        if product.stock < amount {
            warn!(
                product_id = %product.id,
                available = product.stock,
                requested = amount,
                "Insufficient stock"
            );
            return Err(InventoryError::InsufficientStock {
                product_id: product.id,
                requested: amount,
                available: product.stock,
            });
        }
        Ok(())
    }

    /// Lock `ids` and return a unit that can read and write their stock.
    pub async fn lock(&self, ids: &[ProductId]) -> StockUnit<'_> {
        let guards = self.locks.acquire(ids).await;
        StockUnit::new(self.store.as_ref(), guards)
    }

    pub async fn reserve(&self, id: ProductId, amount: u32) -> Result<u32> {
        self.lock(&[id]).await.reserve(id, amount).await
    }

    pub async fn release(&self, id: ProductId, amount: u32) -> Result<u32> {
        self.lock(&[id]).await.release(id, amount).await
    }

    pub async fn adjust(&self, id: ProductId, delta: i64) -> Result<u32> {
        self.lock(&[id]).await.adjust(id, delta).await
    }

    /// Unlocked read of the current stock.
    pub async fn stock_of(&self, id: ProductId) -> Result<u32> {
        self.store
            .get_product_by_id(id)
            .await?
            .map(|p| p.stock)
            .ok_or(InventoryError::ProductNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn ledger_with_stock(stock: u32) -> (StockLedger, ProductId) {
        let store = Arc::new(MemoryStore::new());
        let kind = store.insert_product_type("Minuman").unwrap();
        let product = store.insert_product("Teh", dec!(10), stock, kind.id).unwrap();
        (StockLedger::new(store), product.id)
    }

    #[tokio::test]
    async fn test_reserve_decrements() {
        let (ledger, id) = ledger_with_stock(5);
        assert_eq!(ledger.reserve(id, 3).await.unwrap(), 2);
        assert_eq!(ledger.stock_of(id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reserve_more_than_stock_leaves_stock_alone() {
        let (ledger, id) = ledger_with_stock(2);
        let err = ledger.reserve(id, 3).await.unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock { product_id: id, requested: 3, available: 2 }
        );
        assert_eq!(ledger.stock_of(id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (ledger, _) = ledger_with_stock(2);
        let missing = ProductId(404);
        assert_eq!(ledger.reserve(missing, 1).await, Err(InventoryError::ProductNotFound(missing)));
        assert_eq!(ledger.release(missing, 1).await, Err(InventoryError::ProductNotFound(missing)));
        assert_eq!(ledger.adjust(missing, 1).await, Err(InventoryError::ProductNotFound(missing)));
    }

    #[tokio::test]
    async fn test_lookups_of_missing_products_leave_no_locks_behind() {
        let (ledger, id) = ledger_with_stock(3);
        for n in 1_000..3_000 {
            let missing = ProductId(n);
            assert_eq!(
                ledger.reserve(missing, 1).await,
                Err(InventoryError::ProductNotFound(missing))
            );
        }
        ledger.reserve(id, 1).await.unwrap();
        assert_eq!(ledger.locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_release_and_adjust() {
        let (ledger, id) = ledger_with_stock(1);
        assert_eq!(ledger.release(id, 4).await.unwrap(), 5);
        assert_eq!(ledger.adjust(id, -5).await.unwrap(), 0);
        assert!(matches!(
            ledger.adjust(id, -1).await,
            Err(InventoryError::InsufficientStock { requested: 1, available: 0, .. })
        ));
        assert_eq!(ledger.adjust(id, 2).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_release_overflow_is_rejected() {
        let (ledger, id) = ledger_with_stock(u32::MAX);
        assert!(matches!(ledger.release(id, 1).await, Err(InventoryError::Validation(_))));
        assert_eq!(ledger.stock_of(id).await.unwrap(), u32::MAX);
    }

    #[tokio::test]
    async fn test_adjust_overflow_is_rejected() {
        let (ledger, id) = ledger_with_stock(5);
        assert!(matches!(ledger.adjust(id, i64::MAX).await, Err(InventoryError::Validation(_))));
        assert!(matches!(
            ledger.adjust(id, i64::MIN).await,
            Err(InventoryError::InsufficientStock { requested: u32::MAX, available: 5, .. })
        ));
        assert!(matches!(
            ledger.adjust(id, i64::from(u32::MAX)).await,
            Err(InventoryError::Validation(_))
        ));
        assert_eq!(ledger.stock_of(id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_unit_refuses_products_it_did_not_lock() {
        let (ledger, id) = ledger_with_stock(3);
        let unit = ledger.lock(&[id]).await;
        let other = ProductId(id.0 + 1);
        assert_eq!(unit.reserve(other, 1).await, Err(InventoryError::Unlocked(other)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reserves_never_oversell() {
        let (ledger, id) = ledger_with_stock(10);
        let ledger = Arc::new(ledger);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move { ledger.reserve(id, 3).await })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 3);
        assert_eq!(ledger.stock_of(id).await.unwrap(), 1);
    }
}
