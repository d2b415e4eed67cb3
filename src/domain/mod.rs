pub mod product;
pub mod transaction;

pub use product::*;
pub use transaction::*;
