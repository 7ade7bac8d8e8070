//! Document store gateway - per-collection CRUD over schemaless records.
//!
//! The hosted database is an external collaborator; controllers only see the
//! [`DocumentStore`] trait. [`InMemoryDocumentStore`] is the bundled backend
//! for tests and local development.

mod in_memory;
mod store;

use std::fmt;

use thiserror::Error;

pub use in_memory::InMemoryDocumentStore;
pub use store::DocumentStore;

/// Error type for document store operations.
///
/// Store failures are opaque: network and auth problems both arrive as
/// `Unavailable` with whatever message the backend produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("document not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::Unavailable(_) => 500,
        }
    }
}

/// The four gateway operations, used for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListAll,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::ListAll => "list_all",
            StoreOp::Create => "create",
            StoreOp::Update => "update",
            StoreOp::Delete => "delete",
        };
        f.write_str(name)
    }
}
