//! In-memory store implementation
//!
//! Used by the demo binary and tests. Thread-safe using RwLock per table.
//! Tables are always locked in the order transactions, products, product types.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use super::{InventoryStore, StoreError};
use crate::domain::{
    NewTransaction, Product, ProductId, ProductType, ProductTypeId, Transaction, TransactionId,
    TransactionListing,
};
use crate::query::{TransactionFilter, TransactionQuery};

fn read<'a, T>(
    lock: &'a RwLock<T>,
    table: &'static str,
) -> Result<RwLockReadGuard<'a, T>, StoreError> {
    lock.read().map_err(|_| StoreError::Poisoned(table))
}

fn write<'a, T>(
    lock: &'a RwLock<T>,
    table: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, StoreError> {
    lock.write().map_err(|_| StoreError::Poisoned(table))
}

/// In-memory store for products, product types and transactions
pub struct MemoryStore {
    product_types: RwLock<HashMap<ProductTypeId, ProductType>>,
    products: RwLock<HashMap<ProductId, Product>>,
    transactions: RwLock<BTreeMap<TransactionId, Transaction>>,
    next_product_type_id: AtomicU64,
    next_product_id: AtomicU64,
    next_transaction_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store. Ids start at 1 per table.
    pub fn new() -> Self {
        Self {
            product_types: RwLock::new(HashMap::new()),
            products: RwLock::new(HashMap::new()),
            transactions: RwLock::new(BTreeMap::new()),
            next_product_type_id: AtomicU64::new(1),
            next_product_id: AtomicU64::new(1),
            next_transaction_id: AtomicU64::new(1),
        }
    }

    pub fn insert_product_type(&self, name: impl Into<String>) -> Result<ProductType, StoreError> {
        let id = ProductTypeId(self.next_product_type_id.fetch_add(1, Ordering::SeqCst));
        let product_type = ProductType {
            id,
            name: name.into(),
        };
        write(&self.product_types, "product_types")?.insert(id, product_type.clone());
        Ok(product_type)
    }

    /// Seed a product. Product management lives outside the ledger, so this is
    /// the only way rows get here.
    pub fn insert_product(
        &self,
        product_name: impl Into<String>,
        price: Decimal,
        stock: u32,
        product_type_id: ProductTypeId,
    ) -> Result<Product, StoreError> {
        if price.is_sign_negative() {
            return Err(StoreError::Constraint(format!("price must be >= 0, got {price}")));
        }
        if !read(&self.product_types, "product_types")?.contains_key(&product_type_id) {
            return Err(StoreError::Constraint(format!(
                "product type {product_type_id} does not exist"
            )));
        }

        let id = ProductId(self.next_product_id.fetch_add(1, Ordering::SeqCst));
        let product = Product::new(id, product_name, price, stock, product_type_id);
        write(&self.products, "products")?.insert(id, product.clone());
        Ok(product)
    }

    /// Drop a product row. Transactions that reference it are left alone.
    pub fn remove_product(&self, id: ProductId) -> Result<Product, StoreError> {
        write(&self.products, "products")?
            .remove(&id)
            .ok_or_else(|| StoreError::missing("product", id))
    }

    pub fn transaction_count(&self) -> Result<usize, StoreError> {
        Ok(read(&self.transactions, "transactions")?.len())
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn get_product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(read(&self.products, "products")?.get(&id).cloned())
    }

    async fn update_product_stock(&self, id: ProductId, stock: u32) -> Result<(), StoreError> {
        let mut products = write(&self.products, "products")?;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::missing("product", id))?;
        debug!(product_id = %id, from = product.stock, to = stock, "Stock column written");
        product.stock = stock;
        Ok(())
    }

    async fn get_transaction_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(read(&self.transactions, "transactions")?.get(&id).cloned())
    }

    async fn create_transaction_record(
        &self,
        record: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let id = TransactionId(self.next_transaction_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let transaction = Transaction {
            id,
            buyer_name: record.buyer_name,
            product_id: record.product_id,
            amount_sold: record.amount_sold,
            total_price: record.total_price,
            transaction_date: record.transaction_date,
            created_at: now,
            updated_at: now,
        };
        write(&self.transactions, "transactions")?.insert(id, transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction_record(&self, record: &Transaction) -> Result<bool, StoreError> {
        let mut transactions = write(&self.transactions, "transactions")?;
        match transactions.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_transaction_record(&self, id: TransactionId) -> Result<bool, StoreError> {
        Ok(write(&self.transactions, "transactions")?.remove(&id).is_some())
    }

    async fn restore_transaction_record(&self, record: &Transaction) -> Result<(), StoreError> {
        let mut transactions = write(&self.transactions, "transactions")?;
        if transactions.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!(
                "transaction {} already exists",
                record.id
            )));
        }
        transactions.insert(record.id, record.clone());
        Ok(())
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, StoreError> {
        let transactions = read(&self.transactions, "transactions")?;
        let products = read(&self.products, "products")?;
        let count = transactions
            .values()
            .filter(|t| filter.matches(t, products.get(&t.product_id)))
            .count();
        Ok(count as u64)
    }

    async fn list_transactions_with_product(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionListing>, StoreError> {
        let transactions = read(&self.transactions, "transactions")?;
        let products = read(&self.products, "products")?;
        let product_types = read(&self.product_types, "product_types")?;

        let mut rows: Vec<TransactionListing> = transactions
            .values()
            .filter_map(|t| {
                let product = products.get(&t.product_id);
                if !query.filter.matches(t, product) {
                    return None;
                }
                Some(TransactionListing {
                    transaction: t.clone(),
                    product_name: product.map(|p| p.product_name.clone()),
                    product_type_name: product
                        .and_then(|p| product_types.get(&p.product_type_id))
                        .map(|pt| pt.name.clone()),
                })
            })
            .collect();

        rows.sort_by(|a, b| query.order.compare(a, b));

        let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let limit = query.pagination.limit as usize;
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}
