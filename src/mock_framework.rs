//! # Mock Framework
//!
//! Utilities for testing code that talks to the transaction service without
//! running one.
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests
//! land on, then answer them with helpers like [`expect_create`] or
//! [`expect_delete`].

use tokio::sync::mpsc;

use crate::domain::{
    Transaction, TransactionCreate, TransactionId, TransactionListing, TransactionPatch,
};
use crate::query::{Paginated, TransactionListRequest};
use crate::service::{ServiceResponse, TransactionClient, TransactionRequest};

/// A client whose requests arrive on the returned receiver instead of a
/// running service, so tests can script the replies.
pub fn create_mock_client(buffer_size: usize) -> (TransactionClient, mpsc::Receiver<TransactionRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (TransactionClient::new(sender), receiver)
}

pub async fn expect_create(
    receiver: &mut mpsc::Receiver<TransactionRequest>,
) -> Option<(TransactionCreate, ServiceResponse<Transaction>)> {
    match receiver.recv().await {
        Some(TransactionRequest::CreateTransaction { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

pub async fn expect_update(
    receiver: &mut mpsc::Receiver<TransactionRequest>,
) -> Option<(TransactionId, TransactionPatch, ServiceResponse<Transaction>)> {
    match receiver.recv().await {
        Some(TransactionRequest::UpdateTransaction { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

pub async fn expect_get(
    receiver: &mut mpsc::Receiver<TransactionRequest>,
) -> Option<(TransactionId, ServiceResponse<Transaction>)> {
    match receiver.recv().await {
        Some(TransactionRequest::GetTransaction { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_list(
    receiver: &mut mpsc::Receiver<TransactionRequest>,
) -> Option<(TransactionListRequest, ServiceResponse<Paginated<TransactionListing>>)> {
    match receiver.recv().await {
        Some(TransactionRequest::ListTransactions { request, respond_to }) => Some((request, respond_to)),
        _ => None,
    }
}

pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<TransactionRequest>,
) -> Option<(TransactionId, ServiceResponse<()>)> {
    match receiver.recv().await {
        Some(TransactionRequest::DeleteTransaction { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductId;
    use crate::error::InventoryError;
    use crate::query::Pagination;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn transaction(id: u64) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId(id),
            buyer_name: "Budi".to_string(),
            product_id: ProductId(1),
            amount_sold: 3,
            total_price: dec!(30),
            transaction_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_mock_client_create() {
        let (client, mut receiver) = create_mock_client(10);

        let create_task = tokio::spawn(async move {
            let params = TransactionCreate::new(
                "Budi",
                ProductId(1),
                3,
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            );
            client.create_transaction(params).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.buyer_name, "Budi");
        assert_eq!(params.amount_sold, 3);
        let created = transaction(1);
        responder.send(Ok(created.clone())).unwrap();

        assert_eq!(create_task.await.unwrap(), Ok(created));
    }

    #[tokio::test]
    async fn test_mock_client_passes_service_errors_through() {
        let (client, mut receiver) = create_mock_client(10);

        let update_task = tokio::spawn(async move {
            client
                .update_transaction(TransactionId(7), TransactionPatch::default().amount_sold(9))
                .await
        });

        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, TransactionId(7));
        assert_eq!(patch.amount_sold, Some(9));
        let insufficient = InventoryError::InsufficientStock {
            product_id: ProductId(1),
            requested: 9,
            available: 4,
        };
        responder.send(Err(insufficient.clone())).unwrap();

        assert_eq!(update_task.await.unwrap(), Err(insufficient));
    }

    #[tokio::test]
    async fn test_mock_client_get_list_delete() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move {
            let fetched = client.get_transaction(TransactionId(1)).await;
            let listed = client.list_transactions(TransactionListRequest::default()).await;
            let deleted = client.delete_transaction(TransactionId(1)).await;
            (fetched, listed, deleted)
        });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, TransactionId(1));
        responder.send(Ok(transaction(1))).unwrap();

        let (request, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        assert_eq!(request, TransactionListRequest::default());
        let pagination = Pagination { page: 1, limit: 10 };
        responder.send(Ok(Paginated::new(Vec::new(), 0, pagination))).unwrap();

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, TransactionId(1));
        responder.send(Ok(())).unwrap();

        let (fetched, listed, deleted) = task.await.unwrap();
        assert_eq!(fetched.unwrap().id, TransactionId(1));
        assert_eq!(listed.unwrap().total, 0);
        assert_eq!(deleted, Ok(()));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move { client.get_transaction(TransactionId(3)).await });
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        assert!(matches!(task.await.unwrap(), Err(InventoryError::ActorCommunication(_))));
    }
}
