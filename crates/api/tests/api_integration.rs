//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::ProductId;
use domain::{Money, Product};
use metrics_exporter_prometheus::PrometheusHandle;
use store::InventoryStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (axum::Router, Arc<api::routes::orders::AppState>) {
    let state = api::create_default_state();
    state
        .inventory
        .upsert(Product::new(
            ProductId::new(1),
            "Widget",
            "A basic widget",
            Money::from_minor(100),
            5,
        ))
        .await
        .unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn order_request(user_id: u64, product_id: u64, quantity: u32) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "items": [{ "product_id": product_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app.oneshot(request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_order_applies_discount() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(post_json("/orders", order_request(1, 1, 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["status"], "PLACED");
    assert_eq!(json["total_price"], 270);
    assert_eq!(json["user_id"], 1);
}

#[tokio::test]
async fn test_create_order_unknown_user() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(post_json("/orders", order_request(99, 1, 1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_order_out_of_stock() {
    let (app, state) = setup().await;

    let response = app
        .oneshot(post_json("/orders", order_request(1, 1, 6)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("Out of stock"));
    assert_eq!(state.inventory.get(ProductId::new(1)).await.unwrap().stock, 5);
}

#[tokio::test]
async fn test_create_order_empty_items_is_bad_request() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(post_json(
            "/orders",
            serde_json::json!({ "user_id": 1, "items": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_order_roundtrip() {
    let (app, _) = setup().await;

    let created = app
        .clone()
        .oneshot(post_json("/orders", order_request(1, 1, 2)))
        .await
        .unwrap();
    let created_json = json_body(created).await;
    let order_id = created_json["order_id"].as_u64().unwrap();

    let response = app
        .oneshot(request("GET", &format!("/orders/{order_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["order_id"], order_id);
    assert_eq!(json["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_get_unknown_order() {
    let (app, _) = setup().await;
    let response = app.oneshot(request("GET", "/orders/404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_restores_stock() {
    let (app, state) = setup().await;

    let created = app
        .clone()
        .oneshot(post_json("/orders", order_request(1, 1, 3)))
        .await
        .unwrap();
    let order_id = json_body(created).await["order_id"].as_u64().unwrap();
    assert_eq!(state.inventory.get(ProductId::new(1)).await.unwrap().stock, 2);

    let response = app
        .oneshot(request("DELETE", &format!("/orders/{order_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "CANCELLED");
    assert_eq!(state.inventory.get(ProductId::new(1)).await.unwrap().stock, 5);
}

#[tokio::test]
async fn test_deliver_then_cancel_conflicts() {
    let (app, _) = setup().await;

    let created = app
        .clone()
        .oneshot(post_json("/orders", order_request(1, 1, 1)))
        .await
        .unwrap();
    let order_id = json_body(created).await["order_id"].as_u64().unwrap();

    let delivered = app
        .clone()
        .oneshot(request("PUT", &format!("/orders/{order_id}")))
        .await
        .unwrap();
    assert_eq!(delivered.status(), StatusCode::OK);
    assert_eq!(json_body(delivered).await["status"], "DELIVERED");

    let cancel = app
        .oneshot(request("DELETE", &format!("/orders/{order_id}")))
        .await
        .unwrap();
    assert_eq!(cancel.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_orders_by_user() {
    let (app, _) = setup().await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/orders", order_request(2, 1, 1)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(request("GET", "/orders/users/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_product_endpoints() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(request("GET", "/products/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Widget");
    assert_eq!(json["price"], 100);

    let missing = app
        .clone()
        .oneshot(request("GET", "/products/999"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let list = app.oneshot(request("GET", "/products")).await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    assert!(!json_body(list).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_purge_user_cancels_placed_orders() {
    let (app, state) = setup().await;

    let created = app
        .clone()
        .oneshot(post_json("/orders", order_request(3, 1, 2)))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request("DELETE", "/marketplace/users/3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["cancelled"], 1);
    assert_eq!(state.inventory.get(ProductId::new(1)).await.unwrap().stock, 5);
}

#[tokio::test]
async fn test_purge_user_without_orders_is_not_found() {
    let (app, _) = setup().await;
    let response = app
        .oneshot(request("DELETE", "/marketplace/users/4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup().await;
    let response = app.oneshot(request("GET", "/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
