//! List-sync controllers for an admin dashboard's document collections.
//!
//! Each list page owns a [`ListSync`]: a local mirror of one collection that
//! is refreshed, created into, updated and deleted through a
//! [`DocumentStore`]. Overlapping refreshes and creates are coalesced, and
//! mutations of the same document never overlap.

pub mod auth;
pub mod collections;
pub mod config;
mod controller;
mod document;
mod error;
pub mod filter;
mod form;
pub mod lock;
mod store;
pub mod users;

#[cfg(feature = "http")]
pub mod http;

pub use auth::{AuthError, Credentials, InMemorySessionStore, LoginGate, SessionStore};
pub use config::{ConfigError, DashboardConfig};
pub use controller::{AlwaysConfirm, Confirm, Delete, ListSync, Refresh};
pub use document::{
    require, strip_reserved, CreatePolicy, Document, Fields, ListOrder, Record, StoredDocument,
    RESERVED_FIELDS,
};
pub use error::{SyncError, ValidationError};
pub use filter::{available_tags, filtered, Predicate};
pub use form::{FormSession, FormState, Submitted};
pub use lock::LockError;
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError, StoreOp};
pub use users::{InMemoryUserDirectory, UserDirectory, UserPage, UserRecord};
