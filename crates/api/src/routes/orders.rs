//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::{OrderId, ProductId, UserId};
use domain::{Order, OrderItem};
use saga::{InMemoryAccountClient, InMemoryWalletClient, SagaCoordinator};
use serde::{Deserialize, Serialize};
use store::{InMemoryInventoryStore, InMemoryOrderStore, OrderStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub coordinator: SagaCoordinator<
        InMemoryInventoryStore,
        InMemoryOrderStore,
        InMemoryAccountClient,
        InMemoryWalletClient,
    >,
    pub inventory: InMemoryInventoryStore,
    pub orders: InMemoryOrderStore,
    pub account: InMemoryAccountClient,
    pub wallet: InMemoryWalletClient,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: u64,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: u64,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: u64,
    pub user_id: u64,
    pub total_price: i64,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: u64,
    pub quantity: u32,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id.as_u64(),
            user_id: order.user_id.as_u64(),
            total_price: order.total_price.minor(),
            status: order.status.to_string(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.as_u64(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /orders — run the order creation saga.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let items: Vec<OrderItem> = req
        .items
        .iter()
        .map(|item| OrderItem::new(ProductId::new(item.product_id), item.quantity))
        .collect();

    let order = state
        .coordinator
        .create_order(UserId::new(req.user_id), items)
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/{order_id} — read a single order.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.get(OrderId::new(order_id)).await?;
    Ok(Json(order.into()))
}

/// GET /orders/users/{user_id} — list a user's orders.
pub async fn list_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.list_by_user(UserId::new(user_id)).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// DELETE /orders/{order_id} — run the cancellation saga.
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.coordinator.cancel_order(OrderId::new(order_id)).await?;
    Ok(Json(order.into()))
}

/// PUT /orders/{order_id} — run the delivery transition.
#[tracing::instrument(skip(state))]
pub async fn deliver(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .coordinator
        .deliver_order(OrderId::new(order_id))
        .await?;
    Ok(Json(order.into()))
}
