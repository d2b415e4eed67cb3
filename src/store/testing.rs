//! Fault injection for exercising rollback paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{InventoryStore, MemoryStore, StoreError};
use crate::domain::{
    NewTransaction, Product, ProductId, Transaction, TransactionId, TransactionListing,
};
use crate::query::{TransactionFilter, TransactionQuery};

/// Writes that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    UpdateProductStock,
    CreateTransactionRecord,
    UpdateTransactionRecord,
    DeleteTransactionRecord,
    RestoreTransactionRecord,
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    Always,
    /// Let this many calls through, fail the next one, then heal
    OnceAfter(u32),
}

/// Wraps a [`MemoryStore`] and fails selected writes on demand.
pub struct FlakyStore {
    inner: Arc<MemoryStore>,
    faults: Mutex<HashMap<StoreOp, Fault>>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            faults: Mutex::new(HashMap::new()),
        }
    }

    /// Fail every call of `op` until healed.
    pub fn fail(&self, op: StoreOp) {
        self.faults.lock().unwrap().insert(op, Fault::Always);
    }

    /// Let `successes` calls of `op` through, then fail exactly one.
    pub fn fail_once_after(&self, op: StoreOp, successes: u32) {
        self.faults.lock().unwrap().insert(op, Fault::OnceAfter(successes));
    }

    pub fn heal(&self, op: StoreOp) {
        self.faults.lock().unwrap().remove(&op);
    }

    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        let injected = || Err(StoreError::Database(format!("injected failure: {op:?}")));
        let mut faults = self.faults.lock().unwrap();
        match faults.get(&op).copied() {
            None => Ok(()),
            Some(Fault::Always) => injected(),
            Some(Fault::OnceAfter(0)) => {
                faults.remove(&op);
                injected()
            }
            Some(Fault::OnceAfter(n)) => {
                faults.insert(op, Fault::OnceAfter(n - 1));
                Ok(())
            }
        }
    }
}

#[async_trait]
impl InventoryStore for FlakyStore {
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.inner.get_product_by_id(id).await
    }

    async fn update_product_stock(&self, id: ProductId, stock: u32) -> Result<(), StoreError> {
        self.check(StoreOp::UpdateProductStock)?;
        self.inner.update_product_stock(id, stock).await
    }

    async fn get_transaction_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        self.inner.get_transaction_by_id(id).await
    }

    async fn create_transaction_record(
        &self,
        record: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        self.check(StoreOp::CreateTransactionRecord)?;
        self.inner.create_transaction_record(record).await
    }

    async fn update_transaction_record(&self, record: &Transaction) -> Result<bool, StoreError> {
        self.check(StoreOp::UpdateTransactionRecord)?;
        self.inner.update_transaction_record(record).await
    }

    async fn delete_transaction_record(&self, id: TransactionId) -> Result<bool, StoreError> {
        self.check(StoreOp::DeleteTransactionRecord)?;
        self.inner.delete_transaction_record(id).await
    }

    async fn restore_transaction_record(&self, record: &Transaction) -> Result<(), StoreError> {
        self.check(StoreOp::RestoreTransactionRecord)?;
        self.inner.restore_transaction_record(record).await
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, StoreError> {
        self.inner.count_transactions(filter).await
    }

    async fn list_transactions_with_product(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionListing>, StoreError> {
        self.inner.list_transactions_with_product(query).await
    }
}
