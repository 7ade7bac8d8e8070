use std::sync::Arc;

use async_trait::async_trait;

use super::StoreError;
use crate::document::{Fields, StoredDocument};

/// Abstract per-collection CRUD storage.
///
/// Every call is a direct read or write against the store of record; there is
/// no client-side cache below this trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document in the collection, in store-defined order.
    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Create a document. The store assigns the id and the creation timestamp.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Overwrite the supplied fields of an existing document. Fields not
    /// supplied are left alone; list-typed values are replaced whole.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Hard-delete a document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).list_all(collection).await
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).create(collection, fields).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }
}
