//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the data access layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Backend failure (connection, write, constraint engine)
    #[error("Database error: {0}")]
    Database(String),

    /// A row that the caller expected to exist is gone
    #[error("Missing {entity} with id {id}")]
    Missing { entity: &'static str, id: String },

    /// Insert collided with an existing row
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Row rejected by a column constraint
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A table lock was poisoned by a panicking writer
    #[error("Store lock poisoned: {0}")]
    Poisoned(&'static str),
}

impl StoreError {
    pub fn missing(entity: &'static str, id: impl ToString) -> Self {
        Self::Missing {
            entity,
            id: id.to_string(),
        }
    }
}
