//! Change publisher
//!
//! The only write path into the catalog. A mutation and the revision advance
//! it causes happen under one exclusive lock, so no reader can observe one
//! without the other.
//!
//! Readers take the same lock for exactly one read and never hold it across
//! a sleep, a tick, or an await point.

use parking_lot::Mutex;
use tracing::debug;

use super::errors::{CatalogError, CatalogResult};
use super::record::Producto;
use super::revision::{RevisionClock, RevisionMarker};
use super::store::{CollectionStore, VecStore};

/// A catalog mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert(Producto),
    Replace { id: String, producto: Producto },
    Delete { id: String },
}

impl Mutation {
    fn kind(&self) -> &'static str {
        match self {
            Mutation::Insert(_) => "insert",
            Mutation::Replace { .. } => "replace",
            Mutation::Delete { .. } => "delete",
        }
    }
}

/// Result of a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The stored record, or `None` for deletes
    pub producto: Option<Producto>,
    /// Revision produced by this mutation
    pub revision: RevisionMarker,
}

/// Records and revision captured under a single lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub productos: Vec<Producto>,
    pub revision: RevisionMarker,
}

struct Guarded<S> {
    store: S,
    clock: RevisionClock,
}

/// Owner of the catalog's shared state.
pub struct ChangePublisher<S: CollectionStore = VecStore> {
    inner: Mutex<Guarded<S>>,
}

impl ChangePublisher<VecStore> {
    /// Create an empty in-memory catalog
    pub fn new() -> Self {
        Self::with_store(VecStore::new())
    }
}

impl Default for ChangePublisher<VecStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CollectionStore> ChangePublisher<S> {
    /// Wrap an existing store. The clock starts at its origin.
    pub fn with_store(store: S) -> Self {
        Self {
            inner: Mutex::new(Guarded {
                store,
                clock: RevisionClock::new(),
            }),
        }
    }

    /// Apply a mutation and advance the revision.
    ///
    /// On error the store and the revision are left untouched.
    pub fn mutate(&self, mutation: Mutation) -> CatalogResult<Applied> {
        let kind = mutation.kind();
        let mut guard = self.inner.lock();

        let producto = match mutation {
            Mutation::Insert(producto) => {
                guard.store.insert(producto.clone());
                Some(producto)
            }
            Mutation::Replace { id, producto } => {
                if !guard.store.replace(&id, producto.clone()) {
                    return Err(CatalogError::NotFound(id));
                }
                Some(producto)
            }
            Mutation::Delete { id } => {
                if !guard.store.delete(&id) {
                    return Err(CatalogError::NotFound(id));
                }
                None
            }
        };

        let revision = guard.clock.advance();
        drop(guard);

        debug!(kind, revision = revision.sequence(), "catalog mutated");
        Ok(Applied { producto, revision })
    }

    pub fn insert(&self, producto: Producto) -> CatalogResult<Applied> {
        self.mutate(Mutation::Insert(producto))
    }

    pub fn replace(&self, id: impl Into<String>, producto: Producto) -> CatalogResult<Applied> {
        self.mutate(Mutation::Replace {
            id: id.into(),
            producto,
        })
    }

    pub fn delete(&self, id: impl Into<String>) -> CatalogResult<Applied> {
        self.mutate(Mutation::Delete { id: id.into() })
    }

    /// Current records and revision, read atomically.
    pub fn snapshot(&self) -> Snapshot {
        let guard = self.inner.lock();
        Snapshot {
            productos: guard.store.list(),
            revision: guard.clock.current(),
        }
    }

    /// Snapshot if the revision moved past `baseline`, read atomically.
    ///
    /// Records are only cloned when a change is observed, so this is cheap
    /// to call on every poll tick.
    pub fn snapshot_if_changed(&self, baseline: RevisionMarker) -> Option<Snapshot> {
        let guard = self.inner.lock();
        let revision = guard.clock.current();
        if revision == baseline {
            return None;
        }
        Some(Snapshot {
            productos: guard.store.list(),
            revision,
        })
    }

    /// Current revision only
    pub fn revision(&self) -> RevisionMarker {
        self.inner.lock().clock.current()
    }

    /// All records in iteration order
    pub fn list(&self) -> Vec<Producto> {
        self.inner.lock().store.list()
    }

    /// First record with the given id
    pub fn get(&self, id: &str) -> CatalogResult<Producto> {
        self.inner
            .lock()
            .store
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Producto {
        Producto::new("1", "Widget", 5, "000")
    }

    #[test]
    fn test_insert_advances_revision() {
        let publisher = ChangePublisher::new();
        let before = publisher.revision();

        let applied = publisher.insert(widget()).unwrap();

        assert!(applied.revision > before);
        assert_eq!(publisher.revision(), applied.revision);
        assert_eq!(publisher.list(), vec![widget()]);
    }

    #[test]
    fn test_failed_replace_leaves_revision() {
        let publisher = ChangePublisher::new();
        publisher.insert(widget()).unwrap();
        let before = publisher.snapshot();

        let err = publisher.replace("missing", widget()).unwrap_err();

        assert_eq!(err, CatalogError::NotFound("missing".into()));
        assert_eq!(publisher.snapshot(), before);
    }

    #[test]
    fn test_failed_delete_leaves_revision() {
        let publisher = ChangePublisher::new();
        let before = publisher.revision();

        assert!(publisher.delete("missing").is_err());
        assert_eq!(publisher.revision(), before);
    }

    #[test]
    fn test_delete_returns_no_record() {
        let publisher = ChangePublisher::new();
        publisher.insert(widget()).unwrap();

        let applied = publisher.delete("1").unwrap();
        assert!(applied.producto.is_none());
        assert!(publisher.is_empty());
        assert!(publisher.get("1").is_err());
    }

    #[test]
    fn test_snapshot_stable_without_mutation() {
        let publisher = ChangePublisher::new();
        publisher.insert(widget()).unwrap();

        assert_eq!(publisher.snapshot(), publisher.snapshot());
    }

    #[test]
    fn test_snapshot_if_changed() {
        let publisher = ChangePublisher::new();
        let baseline = publisher.revision();
        assert!(publisher.snapshot_if_changed(baseline).is_none());

        publisher.insert(widget()).unwrap();
        publisher.insert(Producto::new("2", "Gadget", 1, "001")).unwrap();

        let snapshot = publisher.snapshot_if_changed(baseline).unwrap();
        assert_eq!(snapshot.revision.sequence(), 2);
        assert_eq!(snapshot.productos.len(), 2);
    }

    #[test]
    fn test_replace_stores_body_verbatim() {
        let publisher = ChangePublisher::new();
        publisher.insert(widget()).unwrap();

        let updated = Producto::new("1", "Gadget", 9, "111");
        let applied = publisher.replace("1", updated.clone()).unwrap();

        assert_eq!(applied.producto, Some(updated.clone()));
        assert_eq!(publisher.get("1").unwrap(), updated);
    }
}
