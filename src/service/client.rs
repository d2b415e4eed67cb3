use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use super::messages::TransactionRequest;
use crate::domain::{
    Transaction, TransactionCreate, TransactionId, TransactionListing, TransactionPatch,
};
use crate::error::{InventoryError, Result};
use crate::query::{Paginated, TransactionListRequest};

/// Generate a client method that sends a request and awaits its oneshot reply.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| InventoryError::ActorCommunication("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| InventoryError::ActorCommunication("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to a running [`TransactionService`](super::TransactionService).
#[derive(Clone)]
pub struct TransactionClient {
    sender: mpsc::Sender<TransactionRequest>,
}

impl TransactionClient {
    pub fn new(sender: mpsc::Sender<TransactionRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<()> {
        debug!("Sending shutdown request");
        self.sender
            .send(TransactionRequest::Shutdown)
            .await
            .map_err(|_| InventoryError::ActorCommunication("Actor closed".to_string()))
    }
}

client_method!(TransactionClient => fn create_transaction(params: TransactionCreate) -> Transaction as TransactionRequest::CreateTransaction);
client_method!(TransactionClient => fn update_transaction(id: TransactionId, patch: TransactionPatch) -> Transaction as TransactionRequest::UpdateTransaction);
client_method!(TransactionClient => fn get_transaction(id: TransactionId) -> Transaction as TransactionRequest::GetTransaction);
client_method!(TransactionClient => fn list_transactions(request: TransactionListRequest) -> Paginated<TransactionListing> as TransactionRequest::ListTransactions);
client_method!(TransactionClient => fn delete_transaction(id: TransactionId) -> () as TransactionRequest::DeleteTransaction);
