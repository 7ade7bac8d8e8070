//! List-sync controller integration tests.

mod create;
mod mutations;
mod form;
mod jobs;
mod interleave;
