//! HTTP API server for the marketplace order saga system.
//!
//! Exposes the order lifecycle (create / cancel / deliver), catalog reads,
//! and administrative purges over REST, with structured logging (tracing)
//! and Prometheus metrics.

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use common::UserId;
use domain::Money;
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{InMemoryAccountClient, InMemoryWalletClient, SagaCoordinator};
use store::{InMemoryInventoryStore, InMemoryOrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}", delete(routes::orders::cancel))
        .route("/orders/{id}", put(routes::orders::deliver))
        .route("/orders/users/{user_id}", get(routes::orders::list_by_user))
        .route("/products", get(routes::products::list))
        .route("/products/{id}", get(routes::products::get))
        .route("/marketplace/users/{user_id}", delete(routes::admin::purge_user))
        .route("/marketplace", delete(routes::admin::purge_all))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state with explicit retry and lock-wait tuning:
/// in-memory stores and clients, a handful of demo users, and a saga
/// coordinator wired over them.
pub fn create_state(retry: saga::RetryPolicy, lock_timeout: std::time::Duration) -> Arc<AppState> {
    let inventory = InMemoryInventoryStore::new();
    let orders = InMemoryOrderStore::new();
    let account = InMemoryAccountClient::new();
    let wallet = InMemoryWalletClient::new();

    for id in 1..=5u64 {
        account.register_user(UserId::new(id), false);
        wallet.set_balance(UserId::new(id), Money::from_minor(10_000));
    }

    let coordinator = SagaCoordinator::with_policies(
        inventory.clone(),
        orders.clone(),
        account.clone(),
        wallet.clone(),
        retry,
        lock_timeout,
    );

    Arc::new(AppState {
        coordinator,
        inventory,
        orders,
        account,
        wallet,
    })
}

/// Creates application state with the default tuning.
pub fn create_default_state() -> Arc<AppState> {
    create_state(
        saga::RetryPolicy::default(),
        saga::lock::DEFAULT_ACQUIRE_TIMEOUT,
    )
}
