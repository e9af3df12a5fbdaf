//! Local mirror of a remote collection
//!
//! A [`MirrorStore`] holds the last collection fetched from the backend. The
//! whole collection is swapped in one step by [`MirrorStore::replace`]; readers
//! take a [`Snapshot`] (or subscribe to new ones) and never see a half-updated
//! list.
//!
//! A store can optionally be backed by a [`SessionStorage`]: it then hydrates
//! itself from the stored value on construction and writes every replacement
//! back, so the collection survives a view being rebuilt within one session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::core::entity::Resource;
use crate::core::error::StorageError;
use crate::storage::SessionStorage;

/// Version written into the persisted envelope
const PERSIST_VERSION: u32 = 0;

/// One consistent view of the store's collection
#[derive(Debug)]
pub struct Snapshot<T> {
    pub items: Arc<Vec<T>>,
    /// When the collection was last replaced; `None` until the first replace
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of replacements since the store was created
    pub revision: u64,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            updated_at: self.updated_at,
            revision: self.revision,
        }
    }
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            updated_at: None,
            revision: 0,
        }
    }
}

/// Shape of the persisted value: `{"state":{"<name>":[...]},"version":0}`
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: IndexMap<String, Vec<T>>,
    version: u32,
}

struct Persistence {
    storage: Arc<dyn SessionStorage>,
    namespace: String,
}

struct Inner<T> {
    tx: watch::Sender<Snapshot<T>>,
    persistence: Option<Persistence>,
}

/// Single-writer container for the mirrored collection
///
/// Cloning a store yields another handle to the same collection.
pub struct MirrorStore<T: Resource> {
    inner: Arc<Inner<T>>,
}

impl<T: Resource> Clone for MirrorStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Resource> Default for MirrorStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MirrorStore<T> {
    /// An empty, memory-only store
    pub fn new() -> Self {
        Self::build(Snapshot::empty(), None)
    }

    /// A store persisted under `namespace` in `storage`, hydrated from any
    /// value already stored there
    pub fn with_session(
        storage: Arc<dyn SessionStorage>,
        namespace: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let namespace = namespace.into();
        let initial = match storage.get_item(&namespace)? {
            Some(raw) => {
                let items = decode_envelope::<T>(&namespace, &raw)?;
                debug!(
                    namespace = %namespace,
                    count = items.len(),
                    "Hydrated {} from session storage",
                    T::resource_name()
                );
                Snapshot {
                    items: Arc::new(items),
                    updated_at: None,
                    revision: 0,
                }
            }
            None => Snapshot::empty(),
        };

        Ok(Self::build(
            initial,
            Some(Persistence { storage, namespace }),
        ))
    }

    fn build(initial: Snapshot<T>, persistence: Option<Persistence>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner { tx, persistence }),
        }
    }

    /// Swap in a new collection
    ///
    /// Readers observe either the previous collection or the new one. When the
    /// store is session-backed the new collection is also written back while
    /// the swap still holds the write lock, so concurrent replaces leave the
    /// stored copy matching memory. A failed write is logged and the in-memory
    /// value is kept.
    pub fn replace(&self, items: Vec<T>) {
        let count = items.len();
        let items = Arc::new(items);
        let persistence = self.inner.persistence.as_ref();
        let mut revision = 0;
        let mut persisted = Ok(());
        self.inner.tx.send_modify(|snapshot| {
            snapshot.items = Arc::clone(&items);
            snapshot.updated_at = Some(Utc::now());
            snapshot.revision += 1;
            revision = snapshot.revision;
            if let Some(persistence) = persistence {
                persisted = persist(persistence, &items);
            }
        });
        debug!(
            resource = T::resource_name(),
            count,
            revision,
            "Replaced mirrored collection"
        );

        if let (Some(persistence), Err(e)) = (persistence, persisted) {
            warn!(
                namespace = %persistence.namespace,
                error = %e,
                "Failed to persist mirrored collection"
            );
        }
    }

    /// The current collection
    pub fn items(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.inner.tx.borrow().items)
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.tx.borrow().clone()
    }

    /// Receiver notified after every replacement
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.inner.tx.subscribe()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.tx.borrow().updated_at
    }

    pub fn len(&self) -> usize {
        self.inner.tx.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an item by its stable id
    pub fn find(&self, id: &str) -> Option<T> {
        self.inner
            .tx
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    /// End the session: forget the persisted copy and empty the store
    pub fn end_session(&self) -> Result<(), StorageError> {
        let mut removed = Ok(());
        self.inner.tx.send_if_modified(|snapshot| {
            if let Some(persistence) = &self.inner.persistence {
                removed = persistence.storage.remove_item(&persistence.namespace);
                if removed.is_err() {
                    return false;
                }
            }
            snapshot.items = Arc::new(Vec::new());
            snapshot.updated_at = None;
            true
        });
        removed?;
        debug!(resource = T::resource_name(), "Session ended, mirror cleared");
        Ok(())
    }
}

fn persist<T: Resource>(persistence: &Persistence, items: &[T]) -> Result<(), StorageError> {
    let mut state = IndexMap::new();
    state.insert(T::resource_name().to_string(), items.to_vec());
    let envelope = Envelope {
        state,
        version: PERSIST_VERSION,
    };
    let raw = serde_json::to_string(&envelope).map_err(|e| StorageError::Serialization {
        key: persistence.namespace.clone(),
        message: e.to_string(),
    })?;
    persistence.storage.set_item(&persistence.namespace, &raw)
}

fn decode_envelope<T: Resource>(namespace: &str, raw: &str) -> Result<Vec<T>, StorageError> {
    let mut envelope: Envelope<T> =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization {
            key: namespace.to_string(),
            message: e.to_string(),
        })?;
    Ok(envelope
        .state
        .shift_remove(T::resource_name())
        .unwrap_or_default())
}
