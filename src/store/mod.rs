//! Data access layer for products and transactions.
//!
//! - [`InventoryStore`]: the interface the transaction manager consumes
//! - [`MemoryStore`]: in-process implementation used by the demo and tests

mod error;
mod memory;
mod repository;
#[cfg(test)]
pub mod testing;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::InventoryStore;
