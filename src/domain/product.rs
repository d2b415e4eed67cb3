use std::fmt;

use rust_decimal::Decimal;

/// Identifier of a product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a product type row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductTypeId(pub u64);

impl fmt::Display for ProductTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a product. Only used for filtering and display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
}

/// Represents a product in the inventory.
///
/// `stock` is only ever changed through the stock ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub stock: u32,
    pub product_type_id: ProductTypeId,
}

impl Product {
    pub fn new(
        id: ProductId,
        product_name: impl Into<String>,
        price: Decimal,
        stock: u32,
        product_type_id: ProductTypeId,
    ) -> Self {
        Self {
            id,
            product_name: product_name.into(),
            price,
            stock,
            product_type_id,
        }
    }

    /// Price of `amount` units at the current unit price, `None` on overflow.
    pub fn price_for(&self, amount: u32) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(amount))
    }
}
