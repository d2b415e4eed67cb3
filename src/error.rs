use thiserror::Error;

use crate::domain::{ProductId, TransactionId};
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, InventoryError>;

/// Coarse classification of an [`InventoryError`] for callers that only need
/// to pick a response, e.g. an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InsufficientStock,
    Validation,
    Persistence,
    Fatal,
}

impl ErrorKind {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InsufficientStock | ErrorKind::Validation => 400,
            ErrorKind::Persistence | ErrorKind::Fatal => 500,
        }
    }
}

/// Errors returned by stock ledger and transaction operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
    #[error("Product {0} is not locked by the current unit")]
    Unlocked(ProductId),
    #[error("Rollback failed after `{cause}`: {rollback}")]
    RollbackFailed {
        cause: Box<InventoryError>,
        rollback: Box<InventoryError>,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::ProductNotFound(_) | InventoryError::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            InventoryError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            InventoryError::Validation(_) => ErrorKind::Validation,
            InventoryError::Persistence(_) => ErrorKind::Persistence,
            InventoryError::Unlocked(_)
            | InventoryError::RollbackFailed { .. }
            | InventoryError::ActorCommunication(_) => ErrorKind::Fatal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
