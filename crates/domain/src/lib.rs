//! Domain layer for the marketplace saga system.
//!
//! This crate provides the core domain model:
//! - Money in integer minor-currency units with the one-time discount rule
//! - Order and OrderItem records with payload validation
//! - Product catalog entries
//! - OrderStatus state machine for the saga lifecycle

pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod status;

pub use error::DomainError;
pub use money::Money;
pub use order::{Order, OrderItem};
pub use product::Product;
pub use status::OrderStatus;
