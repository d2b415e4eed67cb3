use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::{Transaction, TransactionListing};
use crate::error::InventoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(InventoryError::Validation(format!(
                "Invalid orderBy: {other}. Expected: ASC, DESC"
            ))),
        }
    }
}

/// Columns stored on the transaction row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionColumn {
    CreatedAt,
    TransactionDate,
    BuyerName,
    AmountSold,
    TotalPrice,
}

impl TransactionColumn {
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            TransactionColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            TransactionColumn::TransactionDate => a.transaction_date.cmp(&b.transaction_date),
            TransactionColumn::BuyerName => a.buyer_name.cmp(&b.buyer_name),
            TransactionColumn::AmountSold => a.amount_sold.cmp(&b.amount_sold),
            TransactionColumn::TotalPrice => a.total_price.cmp(&b.total_price),
        }
    }
}

/// Columns reached through the product join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductColumn {
    ProductName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Transaction(TransactionColumn),
    Product(ProductColumn),
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::Transaction(TransactionColumn::CreatedAt)
    }
}

impl FromStr for SortBy {
    type Err = InventoryError;

    /// Parses the query-string spelling used by the HTTP layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sort_by = match s {
            "createdAt" => SortBy::Transaction(TransactionColumn::CreatedAt),
            "transactionDate" => SortBy::Transaction(TransactionColumn::TransactionDate),
            "buyerName" => SortBy::Transaction(TransactionColumn::BuyerName),
            "amountSold" => SortBy::Transaction(TransactionColumn::AmountSold),
            "totalPrice" => SortBy::Transaction(TransactionColumn::TotalPrice),
            "productName" => SortBy::Product(ProductColumn::ProductName),
            other => {
                return Err(InventoryError::Validation(format!("Invalid sortBy: {other}")));
            }
        };
        Ok(sort_by)
    }
}

/// Order clause of a transaction query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderClause {
    pub sort_by: SortBy,
    pub order: SortOrder,
}

impl OrderClause {
    pub fn new(sort_by: SortBy, order: SortOrder) -> Self {
        Self { sort_by, order }
    }

    /// Sorting on a product column has to be evaluated against the joined row.
    pub fn requires_join(&self) -> bool {
        matches!(self.sort_by, SortBy::Product(_))
    }

    /// Total order over joined rows. Ties fall back to the transaction id so
    /// consecutive pages never overlap.
    pub fn compare(&self, a: &TransactionListing, b: &TransactionListing) -> Ordering {
        let ordering = match self.sort_by {
            SortBy::Transaction(column) => column.compare(&a.transaction, &b.transaction),
            SortBy::Product(ProductColumn::ProductName) => a.product_name.cmp(&b.product_name),
        }
        .then_with(|| a.transaction.id.cmp(&b.transaction.id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}
