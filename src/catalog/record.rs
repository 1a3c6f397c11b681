//! Product record
//!
//! The wire names are the catalog's public JSON contract and must not change.

use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Missing fields decode to their zero value, matching the lenient binding
/// the HTTP API has always offered. Type mismatches are still rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Producto {
    /// Identity of the record. Uniqueness is not enforced.
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "cantidad")]
    pub quantity: i64,

    #[serde(rename = "codigo_barras")]
    pub barcode: String,
}

impl Producto {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        barcode: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            barcode: barcode.into(),
        }
    }
}
