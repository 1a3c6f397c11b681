//! Collection store
//!
//! The keyed record container the change publisher guards. Implementations
//! are plain single-threaded containers; exclusive access is the caller's job.

use super::record::Producto;

/// Keyed record storage consumed by the change publisher.
///
/// When duplicate ids exist, lookups act on the first match in iteration order.
pub trait CollectionStore: Send + 'static {
    /// Append a record. No uniqueness check is performed.
    fn insert(&mut self, producto: Producto);

    /// All records in iteration order
    fn list(&self) -> Vec<Producto>;

    /// First record with the given id
    fn get(&self, id: &str) -> Option<Producto>;

    /// Overwrite the first record with the given id. Returns false if absent.
    fn replace(&mut self, id: &str, producto: Producto) -> bool;

    /// Remove the first record with the given id. Returns false if absent.
    fn delete(&mut self, id: &str) -> bool;

    /// Number of records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Default, Clone)]
pub struct VecStore {
    productos: Vec<Producto>,
}

impl VecStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.productos.iter().position(|p| p.id == id)
    }
}

impl CollectionStore for VecStore {
    fn insert(&mut self, producto: Producto) {
        self.productos.push(producto);
    }

    fn list(&self) -> Vec<Producto> {
        self.productos.clone()
    }

    fn get(&self, id: &str) -> Option<Producto> {
        self.position(id).map(|i| self.productos[i].clone())
    }

    fn replace(&mut self, id: &str, producto: Producto) -> bool {
        match self.position(id) {
            Some(i) => {
                self.productos[i] = producto;
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                // remove, not swap_remove: iteration order is observable
                self.productos.remove(i);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.productos.len()
    }
}
