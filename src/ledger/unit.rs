use tracing::{debug, instrument, warn};

use super::locks::ProductGuards;
use super::StockLedger;
use crate::domain::{Product, ProductId};
use crate::error::{InventoryError, Result};
use crate::store::InventoryStore;

/// A set of locked products. Stock reads and writes for those products go
/// through here while the locks are held.
pub struct StockUnit<'a> {
    store: &'a dyn InventoryStore,
    guards: ProductGuards,
}

impl<'a> StockUnit<'a> {
    pub(super) fn new(store: &'a dyn InventoryStore, guards: ProductGuards) -> Self {
        Self { store, guards }
    }

    fn ensure_locked(&self, id: ProductId) -> Result<()> {
        if self.guards.covers(id) {
            Ok(())
        } else {
            Err(InventoryError::Unlocked(id))
        }
    }

    /// Current product row, `ProductNotFound` if it is gone.
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.ensure_locked(id)?;
        self.store
            .get_product_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound(id))
    }

    /// Take `amount` out of stock. Returns the remaining stock.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn reserve(&self, id: ProductId, amount: u32) -> Result<u32> {
        let product = self.product(id).await?;
        StockLedger::ensure_available(&product, amount)?;

        let remaining = product.stock - amount;
        self.write_stock(id, remaining).await?;
        debug!(remaining, "Stock reserved");
        Ok(remaining)
    }

    /// Put `amount` back into stock. Returns the new stock.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn release(&self, id: ProductId, amount: u32) -> Result<u32> {
        let product = self.product(id).await?;
        let restored = product.stock.checked_add(amount).ok_or_else(|| {
            InventoryError::Validation(format!("stock of product {id} would overflow"))
        })?;

        self.write_stock(id, restored).await?;
        debug!(restored, "Stock released");
        Ok(restored)
    }

    /// Move stock by a signed `delta`. Fails with `InsufficientStock` if the
    /// result would be negative.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn adjust(&self, id: ProductId, delta: i64) -> Result<u32> {
        let product = self.product(id).await?;
        let target = i64::from(product.stock).checked_add(delta).ok_or_else(|| {
            InventoryError::Validation(format!("stock of product {id} would overflow"))
        })?;

        if target < 0 {
            let requested = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
            warn!(available = product.stock, requested, "Adjustment would drive stock negative");
            return Err(InventoryError::InsufficientStock {
                product_id: id,
                requested,
                available: product.stock,
            });
        }
        let stock = u32::try_from(target).map_err(|_| {
            InventoryError::Validation(format!("stock of product {id} would overflow"))
        })?;

        self.write_stock(id, stock).await?;
        debug!(stock, "Stock adjusted");
        Ok(stock)
    }

    async fn write_stock(&self, id: ProductId, stock: u32) -> Result<()> {
        self.ensure_locked(id)?;
        self.store.update_product_stock(id, stock).await?;
        Ok(())
    }
}
