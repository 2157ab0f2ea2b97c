//! Domain error types.

use common::ProductId;
use thiserror::Error;

use crate::status::OrderStatus;

/// Errors that can occur while validating or transitioning domain objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An order was submitted without any line items.
    #[error("Order has no items")]
    NoItems,

    /// A line item carried a non-positive quantity.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// The order is not in the required status for the requested transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
}
