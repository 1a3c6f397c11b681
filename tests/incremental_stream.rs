//! Incremental SSE endpoint tests

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
use stockpulse::http_server::{CatalogState, HttpServer, ServerConfig};

fn create_test_server() -> (Router, Arc<CatalogState>) {
    let server = HttpServer::with_config(ServerConfig::with_port(0));
    (server.router(), server.state())
}

fn seed(state: &CatalogState, n: usize) {
    for i in 0..n {
        state
            .publisher
            .insert(Producto::new(i.to_string(), format!("p{i}"), i as i64, "000"))
            .unwrap();
    }
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Accept", "text/event-stream")
        .body(Body::empty())
        .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

/// Parse an SSE body into (event name, JSON data) pairs
fn parse_events(body: &str) -> Vec<(String, Value)> {
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let mut name = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    name = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data = serde_json::from_str(value.trim()).ok();
                }
            }
            Some((name?, data?))
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_streams_every_record_in_order_then_closes() {
    let (app, state) = create_test_server();
    seed(&state, 3);

    let start = Instant::now();
    let response = get(&app, "/productos/incremental").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let elapsed = start.elapsed();
    let events = parse_events(std::str::from_utf8(&body).unwrap());

    assert_eq!(events.len(), 3);
    for (i, (name, data)) in events.iter().enumerate() {
        assert_eq!(name, "producto");
        assert_eq!(data["id"], i.to_string());
        assert_eq!(data["codigo_barras"], "000");
    }
    // default 2 s pause between three events
    assert!(elapsed >= Duration::from_secs(4));

    let metrics = state.metrics.snapshot();
    assert_eq!(metrics.events_emitted, 3);
    assert_eq!(metrics.streams_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_interval_override() {
    let (app, state) = create_test_server();
    seed(&state, 2);

    let start = Instant::now();
    let response = get(&app, "/productos/incremental?interval_ms=50").await;
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(parse_events(std::str::from_utf8(&body).unwrap()).len(), 2);
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_empty_catalog_closes_without_events() {
    let (app, _) = create_test_server();

    let response = get(&app, "/productos/incremental").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(parse_events(std::str::from_utf8(&body).unwrap()).is_empty());
}

#[tokio::test]
async fn test_invalid_interval_rejected() {
    let (app, state) = create_test_server();

    let response = get(&app, "/productos/incremental?interval_ms=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/productos/incremental?interval_ms=soon").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.metrics.snapshot().streams_started, 0);
}

#[tokio::test(start_paused = true)]
async fn test_mutation_during_stream_not_reflected() {
    let (app, state) = create_test_server();
    seed(&state, 2);

    let response = get(&app, "/productos/incremental").await;
    state.publisher.insert(Producto::new("late", "late", 0, "")).unwrap();
    state.publisher.delete("0").unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let ids: Vec<_> = parse_events(std::str::from_utf8(&body).unwrap())
        .into_iter()
        .map(|(_, data)| data["id"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(ids, vec!["0", "1"]);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_stops_producer() {
    let (app, state) = create_test_server();
    seed(&state, 5);

    let response = get(&app, "/productos/incremental?interval_ms=600000").await;
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    let start = Instant::now();
    while state.metrics.streams_cancelled() == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(start.elapsed() < Duration::from_secs(60));
    }
    assert_eq!(state.metrics.streams_completed(), 0);

    // The catalog stays writable
    state.publisher.insert(Producto::default()).unwrap();
}
