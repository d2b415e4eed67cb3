use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::config::LedgerConfig;
use crate::error::{InventoryError, Result};
use crate::manager::TransactionManager;
use crate::service::{TransactionClient, TransactionService};
use crate::store::InventoryStore;

/// Wires the store, the manager and the transaction service together and
/// owns the service task. Must be created inside a Tokio runtime.
pub struct InventorySystem {
    pub transaction_client: TransactionClient,
    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    #[instrument(name = "inventory_system", skip(store, config))]
    pub fn with_store(store: Arc<dyn InventoryStore>, config: LedgerConfig) -> Self {
        info!(
            service_buffer = config.service_buffer,
            default_page_limit = config.default_page_limit,
            "Starting inventory system"
        );

        let manager = Arc::new(TransactionManager::new(store, &config));
        let (service, transaction_client) =
            TransactionService::new(config.service_buffer, manager);
        let handles = vec![tokio::spawn(service.run())];

        info!("Inventory system started successfully");
        Self {
            transaction_client,
            handles,
        }
    }

    /// Stop the service after it has answered every request it accepted.
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down inventory system");
        if let Err(e) = self.transaction_client.shutdown().await {
            // Service already gone, the handles tell us why.
            info!(error = %e, "Transaction service already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Service task failed");
                return Err(InventoryError::ActorCommunication(format!(
                    "Service task failed: {e}"
                )));
            }
        }

        info!("Inventory system shutdown complete");
        Ok(())
    }
}
