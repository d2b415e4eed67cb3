use tokio::sync::oneshot;

use crate::domain::{
    Transaction, TransactionCreate, TransactionId, TransactionListing, TransactionPatch,
};
use crate::error::InventoryError;
use crate::query::{Paginated, TransactionListRequest};

pub type ServiceResponse<T> = oneshot::Sender<Result<T, InventoryError>>;

#[derive(Debug)]
pub enum TransactionRequest {
    CreateTransaction {
        params: TransactionCreate,
        respond_to: ServiceResponse<Transaction>,
    },
    UpdateTransaction {
        id: TransactionId,
        patch: TransactionPatch,
        respond_to: ServiceResponse<Transaction>,
    },
    GetTransaction {
        id: TransactionId,
        respond_to: ServiceResponse<Transaction>,
    },
    ListTransactions {
        request: TransactionListRequest,
        respond_to: ServiceResponse<Paginated<TransactionListing>>,
    },
    DeleteTransaction {
        id: TransactionId,
        respond_to: ServiceResponse<()>,
    },
    Shutdown,
}
