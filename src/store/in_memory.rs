//! InMemoryDocumentStore - HashMap-backed document store for tests and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreOp};
use crate::document::{strip_reserved, Fields, StoredDocument};

#[derive(Default)]
struct State {
    /// Documents per collection, in insertion order.
    collections: HashMap<String, Vec<StoredDocument>>,
    calls: HashMap<StoreOp, usize>,
    /// One-shot failures, consumed by the next call of that kind.
    failures: HashMap<StoreOp, String>,
}

/// In-memory document store.
///
/// Ids are random UUIDs and timestamps are stamped on write, the way a hosted
/// store would. Clone-friendly via Arc: clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of kind `op` fail with `StoreError::Unavailable`.
    pub fn fail_next(&self, op: StoreOp, message: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.failures.insert(op, message.into());
        }
    }

    /// Number of calls of kind `op` made through the `DocumentStore` trait.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Insert a document directly, bypassing call accounting.
    pub fn seed(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut state = self.write()?;
        Ok(insert(&mut state, collection, fields))
    }

    /// Read one document directly.
    pub fn get(&self, collection: &str, id: &str) -> Option<StoredDocument> {
        let state = self.state.read().ok()?;
        state
            .collections
            .get(collection)?
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.state
            .read()
            .map(|state| state.collections.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    /// Count the call and surface any injected failure.
    fn begin(&self, op: StoreOp) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        let mut state = self.write()?;
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(message) = state.failures.remove(&op) {
            debug!(%op, %message, "injected store failure");
            return Err(StoreError::Unavailable(message));
        }
        Ok(state)
    }
}

fn insert(state: &mut State, collection: &str, mut fields: Fields) -> String {
    strip_reserved(&mut fields);
    let id = Uuid::new_v4().simple().to_string();
    let mut doc = StoredDocument::new(id.clone(), fields);
    doc.created_at = Some(Utc::now());
    state
        .collections
        .entry(collection.to_string())
        .or_default()
        .push(doc);
    id
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.begin(StoreOp::ListAll)?;
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut state = self.begin(StoreOp::Create)?;
        Ok(insert(&mut state, collection, fields))
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        let mut state = self.begin(StoreOp::Update)?;
        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        strip_reserved(&mut fields);
        doc.fields.extend(fields);
        doc.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut state = self.begin(StoreOp::Delete)?;
        if let Some(docs) = state.collections.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}
