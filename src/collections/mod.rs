//! The dashboard's four collections.

mod blog;
mod connect_request;
mod job;
mod job_application;

pub use blog::{Blog, Link, AVAILABLE_TAGS};
pub use connect_request::ConnectRequest;
pub use job::{toggle_visibility, Job, JobStats};
pub use job_application::JobApplication;

use crate::document::Record;

/// Every collection name the dashboard manages.
pub const COLLECTIONS: [&str; 4] = [
    Blog::COLLECTION,
    Job::COLLECTION,
    JobApplication::COLLECTION,
    ConnectRequest::COLLECTION,
];

/// Whether `name` is one of the managed collections.
pub fn is_known(name: &str) -> bool {
    COLLECTIONS.contains(&name)
}

/// Drop blank entries from a list of free-text rows.
pub(crate) fn strip_blank(rows: &mut Vec<String>) {
    rows.retain(|row| !row.trim().is_empty());
}

/// Give an empty list of rows a single blank entry.
pub(crate) fn ensure_row<T: Default>(rows: &mut Vec<T>) {
    if rows.is_empty() {
        rows.push(T::default());
    }
}

/// Remove row `index`, never leaving the list without a row.
pub(crate) fn remove_row<T>(rows: &mut Vec<T>, index: usize) {
    if rows.len() > 1 && index < rows.len() {
        rows.remove(index);
    }
}
