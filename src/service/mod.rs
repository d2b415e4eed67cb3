//! Actor front door for the transaction manager.
//!
//! [`TransactionService`] owns the receiving end of a channel and runs each
//! request on its own task against a shared [`TransactionManager`]. Callers
//! hold a cheap, cloneable [`TransactionClient`].
//!
//! [`TransactionManager`]: crate::manager::TransactionManager

mod client;
mod messages;
mod transaction_service;

pub use client::TransactionClient;
pub use messages::{ServiceResponse, TransactionRequest};
pub use transaction_service::TransactionService;
