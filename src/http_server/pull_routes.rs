//! Change Delivery HTTP Routes
//!
//! - `GET /productos/short-pulling` - snapshot, answers immediately
//! - `GET /productos/long-pulling` - waits for a change or the timeout
//! - `GET /productos/incremental` - Server-Sent Events, one `producto` event per record

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Producto, Snapshot};
use crate::delivery::AwaitOutcome;

use super::error::ApiError;
use super::productos_routes::MessageResponse;
use super::state::CatalogState;

/// SSE event name for streamed records
pub const PRODUCTO_EVENT: &str = "producto";

/// Long-poll answer when nothing changed
pub const NO_CHANGES_MESSAGE: &str = "No hay cambios";

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub productos: Vec<Producto>,
    pub ultima_actualizacion: DateTime<Utc>,
    pub revision: u64,
}

impl From<Snapshot> for SnapshotResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            productos: snapshot.productos,
            ultima_actualizacion: snapshot.revision.updated_at(),
            revision: snapshot.revision.sequence(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IncrementalQuery {
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

// ==================
// Delivery Routes
// ==================

/// Create change delivery routes
pub fn pull_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/productos/short-pulling", get(short_pull_handler))
        .route("/productos/long-pulling", get(long_pull_handler))
        .route("/productos/incremental", get(incremental_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn short_pull_handler(State(state): State<Arc<CatalogState>>) -> Json<SnapshotResponse> {
    state.metrics.increment_short_pulls();
    Json(state.publisher.snapshot().into())
}

/// Logs a long poll whose request future was dropped before answering.
struct PendingPoll {
    answered: bool,
}

impl Drop for PendingPoll {
    fn drop(&mut self) {
        if !self.answered {
            debug!("long poll cancelled by peer");
        }
    }
}

async fn long_pull_handler(State(state): State<Arc<CatalogState>>) -> Response {
    let mut pending = PendingPoll { answered: false };
    let outcome = state.await_change().wait(state.publisher.as_ref()).await;
    pending.answered = true;

    match outcome {
        AwaitOutcome::Changed(snapshot) => {
            state.metrics.increment_long_pulls_changed();
            Json(SnapshotResponse::from(snapshot)).into_response()
        }
        AwaitOutcome::TimedOut => {
            state.metrics.increment_long_pulls_timed_out();
            Json(MessageResponse {
                message: NO_CHANGES_MESSAGE.to_string(),
            })
            .into_response()
        }
    }
}

async fn incremental_handler(
    State(state): State<Arc<CatalogState>>,
    query: Result<Query<IncrementalQuery>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    if query.interval_ms == Some(0) {
        return Err(ApiError::validation("interval_ms must be greater than zero"));
    }

    let stream = state
        .emitter(query.interval_ms)
        .stream(state.publisher.as_ref())
        .map(|producto| Event::default().event(PRODUCTO_EVENT).json_data(&producto));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
