use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, Instrument};

use super::client::TransactionClient;
use super::messages::{ServiceResponse, TransactionRequest};
use crate::error::Result;
use crate::manager::TransactionManager;

/// Transaction actor. Requests for different products run concurrently;
/// the manager's product locks serialise the ones that touch the same stock.
pub struct TransactionService {
    receiver: mpsc::Receiver<TransactionRequest>,
    manager: Arc<TransactionManager>,
    tasks: JoinSet<()>,
}

impl TransactionService {
    pub fn new(buffer_size: usize, manager: Arc<TransactionManager>) -> (Self, TransactionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            manager,
            tasks: JoinSet::new(),
        };
        (service, TransactionClient::new(sender))
    }

    #[instrument(name = "transaction_service", skip(self))]
    pub async fn run(mut self) {
        info!("TransactionService starting");
        loop {
            tokio::select! {
                Some(joined) = self.tasks.join_next() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Request task failed");
                    }
                }
                msg = self.receiver.recv() => match msg {
                    Some(TransactionRequest::Shutdown) => {
                        info!("TransactionService shutting down");
                        break;
                    }
                    Some(request) => self.dispatch(request),
                    None => {
                        debug!("All clients dropped");
                        break;
                    }
                },
            }
        }

        // Requests already accepted still get their answer.
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Request task failed");
            }
        }
        info!("TransactionService stopped");
    }

    fn dispatch(&mut self, request: TransactionRequest) {
        let manager = Arc::clone(&self.manager);
        match request {
            TransactionRequest::CreateTransaction { params, respond_to } => {
                debug!("Processing create_transaction request");
                self.spawn(respond_to, async move { manager.create_transaction(params).await });
            }
            TransactionRequest::UpdateTransaction { id, patch, respond_to } => {
                debug!(transaction_id = %id, "Processing update_transaction request");
                self.spawn(respond_to, async move { manager.update_transaction(id, patch).await });
            }
            TransactionRequest::GetTransaction { id, respond_to } => {
                debug!(transaction_id = %id, "Processing get_transaction request");
                self.spawn(respond_to, async move { manager.get_transaction(id).await });
            }
            TransactionRequest::ListTransactions { request, respond_to } => {
                debug!("Processing list_transactions request");
                self.spawn(respond_to, async move { manager.list_transactions(request).await });
            }
            TransactionRequest::DeleteTransaction { id, respond_to } => {
                debug!(transaction_id = %id, "Processing delete_transaction request");
                self.spawn(respond_to, async move { manager.delete_transaction(id).await });
            }
            TransactionRequest::Shutdown => {}
        }
    }

    /// The spawned task owns `respond_to` and answers when the work is done.
    fn spawn<T, F>(&mut self, respond_to: ServiceResponse<T>, work: F)
    where
        T: Send + 'static,
        F: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        self.tasks.spawn(
            async move {
                if respond_to.send(work.await).is_err() {
                    debug!("Caller went away before the response");
                }
            }
            .in_current_span(),
        );
    }
}
