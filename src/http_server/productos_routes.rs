//! Catalog HTTP Routes
//!
//! Create, read, update and delete endpoints for `/productos`. Every mutation
//! goes through the change publisher.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::catalog::{Applied, CatalogResult, Producto};

use super::error::ApiError;
use super::state::CatalogState;

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ProductosResponse {
    pub productos: Vec<Producto>,
}

#[derive(Debug, Serialize)]
pub struct ProductoResponse {
    pub producto: Producto,
}

#[derive(Debug, Serialize)]
pub struct ProductoMessageResponse {
    pub message: String,
    pub producto: Producto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================
// Catalog Routes
// ==================

/// Create catalog routes
pub fn productos_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/productos", get(list_handler).post(create_handler))
        .route(
            "/productos/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Decode a record body. The content type is not checked.
fn decode(state: &CatalogState, body: &[u8]) -> Result<Producto, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        state.metrics.increment_mutations_rejected();
        ApiError::validation(e.to_string())
    })
}

fn record_outcome(state: &CatalogState, result: CatalogResult<Applied>) -> Result<Applied, ApiError> {
    match result {
        Ok(applied) => {
            state.metrics.increment_mutations_applied();
            Ok(applied)
        }
        Err(e) => {
            state.metrics.increment_mutations_rejected();
            Err(e.into())
        }
    }
}

// ==================
// Handlers
// ==================

async fn create_handler(
    State(state): State<Arc<CatalogState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProductoMessageResponse>), ApiError> {
    let producto = decode(&state, &body)?;
    record_outcome(&state, state.publisher.insert(producto.clone()))?;

    Ok((
        StatusCode::CREATED,
        Json(ProductoMessageResponse {
            message: "Producto creado".to_string(),
            producto,
        }),
    ))
}

async fn list_handler(State(state): State<Arc<CatalogState>>) -> Json<ProductosResponse> {
    Json(ProductosResponse {
        productos: state.publisher.list(),
    })
}

async fn get_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductoResponse>, ApiError> {
    let producto = state.publisher.get(&id)?;
    Ok(Json(ProductoResponse { producto }))
}

async fn update_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ProductoMessageResponse>, ApiError> {
    let producto = decode(&state, &body)?;
    record_outcome(&state, state.publisher.replace(id, producto.clone()))?;

    Ok(Json(ProductoMessageResponse {
        message: "Producto actualizado".to_string(),
        producto,
    }))
}

async fn delete_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    record_outcome(&state, state.publisher.delete(id))?;

    Ok(Json(MessageResponse {
        message: "Producto eliminado".to_string(),
    }))
}
