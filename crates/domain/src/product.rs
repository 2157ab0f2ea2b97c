//! Product catalog entries.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product in the local inventory.
///
/// Stock never goes negative; concurrent modifications to the same product
/// are serialized by its lock in the saga layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Unit price in minor units.
    pub price: Money,
    /// Units currently available.
    pub stock: u32,
}

impl Product {
    /// Creates a new product entry.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }
}
