//! Long-poll endpoint tests
//!
//! Run on paused tokio time so the 1 s cadence and 30 s bound are exact.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::time::Instant;
use tower::ServiceExt;

use stockpulse::catalog::Producto;
use stockpulse::delivery::DeliveryConfig;
use stockpulse::http_server::{CatalogState, HttpServer, ServerConfig};

const POLL: Duration = Duration::from_secs(1);
const MAX_WAIT: Duration = Duration::from_secs(30);

fn create_test_server() -> (Router, Arc<CatalogState>) {
    let state = Arc::new(CatalogState::new(DeliveryConfig::default()));
    let server = HttpServer::with_state(ServerConfig::with_port(0), state);
    (server.router(), server.state())
}

async fn long_pull(app: Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/productos/long-pulling")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_no_change_answers_after_timeout() {
    let (app, state) = create_test_server();

    let start = Instant::now();
    let (status, body) = long_pull(app).await;
    let elapsed = start.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"message": "No hay cambios"}));
    assert!(elapsed >= MAX_WAIT);
    assert!(elapsed <= MAX_WAIT + POLL);
    assert_eq!(state.metrics.snapshot().long_pulls_timed_out, 1);
}

#[tokio::test(start_paused = true)]
async fn test_change_answers_within_one_interval() {
    let (app, state) = create_test_server();
    let baseline = state.publisher.revision();

    let start = Instant::now();
    let request = tokio::spawn(long_pull(app));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    state
        .publisher
        .insert(Producto::new("1", "Widget", 5, "000"))
        .unwrap();
    let mutated_at = start.elapsed();

    let (status, body) = request.await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productos"][0]["nombre"], "Widget");
    assert_ne!(body["revision"].as_u64().unwrap(), baseline.sequence());
    assert!(elapsed <= mutated_at + POLL);
    assert!(elapsed < MAX_WAIT);
    assert_eq!(state.metrics.snapshot().long_pulls_changed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_mutations_within_interval_are_coalesced() {
    let (app, state) = create_test_server();

    let request = tokio::spawn(long_pull(app));

    tokio::time::sleep(Duration::from_millis(1200)).await;
    state.publisher.insert(Producto::new("1", "a", 1, "")).unwrap();
    state.publisher.insert(Producto::new("2", "b", 2, "")).unwrap();
    state.publisher.delete("1").unwrap();

    let (_, body) = request.await.unwrap();

    assert_eq!(body["revision"], 3);
    assert_eq!(body["productos"].as_array().unwrap().len(), 1);
    assert_eq!(body["productos"][0]["id"], "2");
}

#[tokio::test(start_paused = true)]
async fn test_rejected_mutation_does_not_wake_waiter() {
    let (app, state) = create_test_server();

    let request = tokio::spawn(long_pull(app));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(state.publisher.delete("missing").is_err());

    let (_, body) = request.await.unwrap();
    assert_eq!(body["message"], "No hay cambios");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waiters_all_observe_change() {
    let (app, state) = create_test_server();

    let requests: Vec<_> = (0..8).map(|_| tokio::spawn(long_pull(app.clone()))).collect();

    tokio::time::sleep(Duration::from_millis(3300)).await;
    state.publisher.insert(Producto::new("1", "Widget", 5, "000")).unwrap();

    for request in requests {
        let (_, body) = request.await.unwrap();
        assert_eq!(body["revision"], 1);
    }
    assert_eq!(state.metrics.snapshot().long_pulls_changed, 8);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_request_leaves_nothing_behind() {
    let (app, state) = create_test_server();

    let request = tokio::spawn(long_pull(app));
    tokio::time::sleep(Duration::from_secs(5)).await;
    request.abort();
    assert!(request.await.unwrap_err().is_cancelled());

    state.publisher.insert(Producto::default()).unwrap();
    tokio::time::sleep(MAX_WAIT).await;

    let metrics = state.metrics.snapshot();
    assert_eq!(metrics.long_pulls_changed, 0);
    assert_eq!(metrics.long_pulls_timed_out, 0);
}
