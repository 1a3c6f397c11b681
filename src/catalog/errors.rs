//! # Catalog Errors

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors. Every variant leaves the catalog untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No record with the requested id
    #[error("Producto no encontrado")]
    NotFound(String),

    /// Request payload could not be decoded
    #[error("Error al decodificar el cuerpo de la solicitud")]
    Validation(String),
}

impl CatalogError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::NotFound(_) => 404,
            CatalogError::Validation(_) => 400,
        }
    }

    /// Underlying detail (offending id or decoder message)
    pub fn detail(&self) -> &str {
        match self {
            CatalogError::NotFound(id) => id,
            CatalogError::Validation(msg) => msg,
        }
    }
}
