//! List-sync controllers - an in-memory mirror of one collection kept in step
//! with the document store.
//!
//! ## Example
//!
//! ```ignore
//! use admin_sync::{collections::Blog, InMemoryDocumentStore, ListSync};
//!
//! let blogs = ListSync::<_, Blog>::new(InMemoryDocumentStore::new());
//! blogs.refresh().await?;
//! let id = blogs.create(draft).await?;
//! blogs.delete(&id, &|_: &str| true).await?;
//! ```

mod confirm;
mod list_sync;
mod mirror;

pub use confirm::{AlwaysConfirm, Confirm};
pub use list_sync::{Delete, ListSync, Refresh};
