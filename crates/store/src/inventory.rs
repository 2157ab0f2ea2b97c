//! Inventory store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::Product;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::Result;

/// Per-product stock and price storage.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Reads a product by id.
    async fn get(&self, product_id: ProductId) -> Result<Product>;

    /// Lists all products in the catalog.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Inserts or replaces a product entry.
    async fn upsert(&self, product: Product) -> Result<()>;

    /// Atomically adjusts a product's stock by `delta`.
    ///
    /// A negative delta that exceeds the available stock is rejected with
    /// [`StoreError::InsufficientStock`] and leaves the stock untouched.
    /// Returns the stock after the adjustment.
    async fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<u32>;
}

/// In-memory inventory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryStore {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty inventory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of catalog entries.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn get(&self, product_id: ProductId) -> Result<Product> {
        self.products
            .read()
            .await
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(product_id))
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn upsert(&self, product: Product) -> Result<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn adjust_stock(&self, product_id: ProductId, delta: i64) -> Result<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;

        let new_stock = i64::from(product.stock) + delta;
        if new_stock < 0 {
            return Err(StoreError::InsufficientStock {
                product_id,
                available: product.stock,
                requested: delta.unsigned_abs() as u32,
            });
        }
        product.stock = new_stock as u32;
        Ok(product.stock)
    }
}
