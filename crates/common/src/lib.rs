//! Shared identifier types used across the marketplace crates.

pub mod types;

pub use types::{OrderId, ProductId, UserId};
