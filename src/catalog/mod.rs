//! # Catalog
//!
//! The shared product collection and its revision marker.
//!
//! ## Architecture
//!
//! - **Store**: keyed record container ([`CollectionStore`])
//! - **Revision clock**: monotonic "last modified" marker
//! - **Change publisher**: single exclusive-access write path over both

pub mod errors;
pub mod publisher;
pub mod record;
pub mod revision;
pub mod store;

pub use errors::{CatalogError, CatalogResult};
pub use publisher::{Applied, ChangePublisher, Mutation, Snapshot};
pub use record::Producto;
pub use revision::{RevisionClock, RevisionMarker};
pub use store::{CollectionStore, VecStore};
