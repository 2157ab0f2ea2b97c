//! Persistence boundary for the marketplace saga system.
//!
//! Defines the [`InventoryStore`] and [`OrderStore`] traits the saga
//! coordinator works against, plus in-memory implementations. Stock
//! adjustments are atomic and conditional: a decrement that would drive
//! stock negative is rejected, never partially applied.

pub mod error;
pub mod inventory;
pub mod orders;

pub use error::StoreError;
pub use inventory::{InMemoryInventoryStore, InventoryStore};
pub use orders::{InMemoryOrderStore, OrderStore};

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
