use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::ProductId;

/// Identifier of a transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sale of some amount of one product.
///
/// `total_price` is always derived from the product price at the time of the
/// last write and never taken from caller input.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub buyer_name: String,
    pub product_id: ProductId,
    pub amount_sold: u32,
    pub total_price: Decimal,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new transaction.
#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub buyer_name: String,
    pub product_id: ProductId,
    pub amount_sold: u32,
    pub transaction_date: NaiveDate,
}

impl TransactionCreate {
    pub fn new(
        buyer_name: impl Into<String>,
        product_id: ProductId,
        amount_sold: u32,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            buyer_name: buyer_name.into(),
            product_id,
            amount_sold,
            transaction_date,
        }
    }
}

/// Row handed to the store on insert. The store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub buyer_name: String,
    pub product_id: ProductId,
    pub amount_sold: u32,
    pub total_price: Decimal,
    pub transaction_date: NaiveDate,
}

/// Fields a caller may change on an existing transaction. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub buyer_name: Option<String>,
    pub product_id: Option<ProductId>,
    pub amount_sold: Option<u32>,
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn buyer_name(mut self, buyer_name: impl Into<String>) -> Self {
        self.buyer_name = Some(buyer_name.into());
        self
    }

    pub fn product_id(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn amount_sold(mut self, amount_sold: u32) -> Self {
        self.amount_sold = Some(amount_sold);
        self
    }

    pub fn transaction_date(mut self, transaction_date: NaiveDate) -> Self {
        self.transaction_date = Some(transaction_date);
        self
    }
}

/// A transaction joined with the product it sold, as returned by listings.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListing {
    pub transaction: Transaction,
    pub product_name: Option<String>,
    pub product_type_name: Option<String>,
}
