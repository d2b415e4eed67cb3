//! Inventory consistency core for a small point-of-sale system.
//!
//! Every sale is a [`Transaction`](domain::Transaction) against one product.
//! Creating, amending or deleting a sale moves that product's stock through
//! the [`StockLedger`](ledger::StockLedger) in the same unit of work, so the
//! amounts of live transactions and the remaining stock always agree.
//!
//! ```text
//! TransactionClient -> TransactionService -> TransactionManager -> StockLedger
//!                                                   |                  |
//!                                                   +--> InventoryStore <--+
//! ```

pub mod app_system;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod manager;
pub mod query;
pub mod service;
pub mod store;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, InventorySystem};
pub use config::LedgerConfig;
pub use error::{ErrorKind, InventoryError, Result};
pub use manager::TransactionManager;
pub use service::TransactionClient;
