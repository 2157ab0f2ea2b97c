//! Product catalog read endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use common::ProductId;
use domain::Product;
use serde::Serialize;
use store::InventoryStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct ProductResponse {
    pub product_id: u64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: u32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id.as_u64(),
            name: product.name,
            description: product.description,
            price: product.price.minor(),
            stock: product.stock,
        }
    }
}

/// GET /products — list the catalog.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.inventory.list().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{product_id} — read one product.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<u64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.inventory.get(ProductId::new(product_id)).await?;
    Ok(Json(product.into()))
}
