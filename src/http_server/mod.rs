//! # HTTP Server Module
//!
//! Axum server exposing the product catalog and its three delivery modes.
//!
//! # Endpoints
//!
//! - `/productos` and `/productos/{id}` - catalog CRUD
//! - `/productos/short-pulling` - immediate snapshot
//! - `/productos/long-pulling` - wait for change or timeout
//! - `/productos/incremental` - Server-Sent Events stream
//! - `/health`, `/metrics` - observability

pub mod config;
pub mod error;
pub mod observability_routes;
pub mod productos_routes;
pub mod pull_routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::HttpServer;
pub use state::CatalogState;
