//! Administrative purge endpoints.
//!
//! Purging cancels every `PLACED` order through the cancellation saga so
//! stock and wallet balances are restored; orders already in a terminal
//! status are left as they are.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::UserId;
use domain::Order;
use serde::Serialize;
use store::OrderStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Serialize)]
pub struct PurgeResponse {
    pub cancelled: usize,
    pub skipped: usize,
}

async fn cancel_placed(state: &AppState, orders: Vec<Order>) -> PurgeResponse {
    let mut cancelled = 0;
    let mut skipped = 0;
    for order in orders {
        if !order.status.can_cancel() {
            skipped += 1;
            continue;
        }
        match state.coordinator.cancel_order(order.id).await {
            Ok(_) => cancelled += 1,
            Err(err) => {
                tracing::warn!(order_id = %order.id, error = %err, "purge cancellation failed");
                skipped += 1;
            }
        }
    }
    PurgeResponse { cancelled, skipped }
}

/// DELETE /marketplace/users/{user_id} — cancel all of a user's placed orders.
#[tracing::instrument(skip(state))]
pub async fn purge_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let orders = state.orders.list_by_user(UserId::new(user_id)).await?;
    if orders.is_empty() {
        return Err(ApiError::Saga(saga::SagaError::NotFound(format!(
            "Orders for user {user_id}"
        ))));
    }
    Ok(Json(cancel_placed(&state, orders).await))
}

/// DELETE /marketplace — cancel every placed order in the system.
#[tracing::instrument(skip(state))]
pub async fn purge_all(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<PurgeResponse>), ApiError> {
    let orders = state.orders.list().await?;
    Ok((StatusCode::OK, Json(cancel_placed(&state, orders).await)))
}
