use std::collections::HashMap;
use std::sync::{Arc, Mutex as TableMutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ProductId;

type LockTable = HashMap<ProductId, Arc<Mutex<()>>>;

fn table(locks: &TableMutex<LockTable>) -> MutexGuard<'_, LockTable> {
    // The table is only touched in short, non-panicking sections.
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One async mutex per product, created on first use. An entry lives only
/// while some unit holds or waits for it.
#[derive(Default)]
pub struct ProductLocks {
    locks: Arc<TableMutex<LockTable>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_lock(&self, id: ProductId) -> Arc<Mutex<()>> {
        table(&self.locks)
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Lock every product in `ids`. Locks are taken in ascending id order so
    /// two units touching the same pair of products cannot deadlock.
    pub async fn acquire(&self, ids: &[ProductId]) -> ProductGuards {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = ProductGuards {
            table: Arc::clone(&self.locks),
            guards: Vec::with_capacity(ids.len()),
        };
        for id in ids {
            let lock = self.get_lock(id);
            guards.guards.push((id, lock.lock_owned().await));
        }
        guards
    }

    /// Number of products with a live lock entry.
    #[cfg(test)]
    pub(super) fn tracked(&self) -> usize {
        table(&self.locks).len()
    }
}

/// Locks held by one unit; dropping this releases them.
pub struct ProductGuards {
    table: Arc<TableMutex<LockTable>>,
    guards: Vec<(ProductId, OwnedMutexGuard<()>)>,
}

impl ProductGuards {
    pub fn covers(&self, id: ProductId) -> bool {
        self.guards.iter().any(|(locked, _)| *locked == id)
    }
}

impl Drop for ProductGuards {
    fn drop(&mut self) {
        let released: Vec<ProductId> = self
            .guards
            .drain(..)
            .map(|(id, guard)| {
                drop(guard);
                id
            })
            .collect();

        // Handles are only cloned under the table lock, so a count of one
        // means nobody holds or waits for this product.
        let mut entries = table(&self.table);
        for id in released {
            if entries.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                entries.remove(&id);
            }
        }
    }
}
