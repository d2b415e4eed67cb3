use chrono::NaiveDate;

use crate::domain::{Product, ProductId, ProductTypeId, Transaction};

/// Inclusive range of transaction dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Criteria a transaction must meet to appear in a listing or count.
///
/// Every criterion is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the buyer name
    pub buyer_name: Option<String>,
    pub product_id: Option<ProductId>,
    /// Matched through the transaction's product
    pub product_type_id: Option<ProductTypeId>,
    pub date_range: Option<DateRange>,
}

impl TransactionFilter {
    pub fn buyer_name(mut self, buyer_name: impl Into<String>) -> Self {
        self.buyer_name = Some(buyer_name.into());
        self
    }

    pub fn product_id(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn product_type_id(mut self, product_type_id: ProductTypeId) -> Self {
        self.product_type_id = Some(product_type_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    /// Whether `transaction`, joined with its `product` (if that row still
    /// exists), satisfies every criterion.
    pub fn matches(&self, transaction: &Transaction, product: Option<&Product>) -> bool {
        if let Some(needle) = self.buyer_name.as_deref().filter(|n| !n.is_empty()) {
            let haystack = transaction.buyer_name.to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }

        if let Some(product_id) = self.product_id {
            if transaction.product_id != product_id {
                return false;
            }
        }

        if let Some(product_type_id) = self.product_type_id {
            if product.map(|p| p.product_type_id) != Some(product_type_id) {
                return false;
            }
        }

        if let Some(range) = self.date_range {
            if !range.contains(transaction.transaction_date) {
                return false;
            }
        }

        true
    }
}
