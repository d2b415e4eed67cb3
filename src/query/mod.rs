//! Builds the filter, order and page window of a transaction listing.
//!
//! Everything here is pure: a [`TransactionListRequest`] goes in, a
//! [`TransactionQuery`] comes out, and the store executes it.

mod filter;
mod pagination;
mod sort;

pub use filter::{DateRange, TransactionFilter};
pub use pagination::{Paginated, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use sort::{OrderClause, ProductColumn, SortBy, SortOrder, TransactionColumn};

/// Caller-facing listing parameters. Absent values take their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionListRequest {
    pub filter: TransactionFilter,
    pub sort_by: Option<SortBy>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TransactionListRequest {
    pub fn filter(mut self, filter: TransactionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort_by: SortBy, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

/// Fully resolved query handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub order: OrderClause,
    pub pagination: Pagination,
}

impl TransactionQuery {
    pub fn build(request: &TransactionListRequest, default_limit: u32) -> Self {
        Self {
            filter: request.filter.clone(),
            order: OrderClause::new(
                request.sort_by.unwrap_or_default(),
                request.order.unwrap_or_default(),
            ),
            pagination: Pagination::resolve(request.page, request.limit, default_limit),
        }
    }
}
