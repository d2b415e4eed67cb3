//! Repository trait (port) consumed by the stock ledger and transaction manager.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::{
    NewTransaction, Product, ProductId, Transaction, TransactionId, TransactionListing,
};
use crate::query::{TransactionFilter, TransactionQuery};

/// Persistent storage for products and transactions.
///
/// Implementations make each call atomic on its own. Grouping calls into a
/// unit (and undoing them) is the caller's job.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Overwrite the stock column of a product
    async fn update_product_stock(&self, id: ProductId, stock: u32) -> Result<(), StoreError>;

    async fn get_transaction_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Insert a row, assigning its id and timestamps
    async fn create_transaction_record(
        &self,
        record: NewTransaction,
    ) -> Result<Transaction, StoreError>;

    /// Replace a row. Returns `false` when no row has that id.
    async fn update_transaction_record(&self, record: &Transaction) -> Result<bool, StoreError>;

    /// Hard delete. Returns `false` when no row has that id.
    async fn delete_transaction_record(&self, id: TransactionId) -> Result<bool, StoreError>;

    /// Re-insert a previously deleted row under its original id
    async fn restore_transaction_record(&self, record: &Transaction) -> Result<(), StoreError>;

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, StoreError>;

    /// One page of transactions joined with their product and product type
    async fn list_transactions_with_product(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionListing>, StoreError>;
}
