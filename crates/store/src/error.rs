//! Store error types.

use common::{OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No product with the given id exists.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No order with the given id exists.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A stock decrement would drive the quantity negative.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// The backing storage failed.
    #[error("Storage failure: {0}")]
    Storage(String),
}
