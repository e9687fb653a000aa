//! Git abstraction for transync
//!
//! Wraps a git working copy so a backend can refresh it from upstream
//! before a sync and publish local changes after one.

pub mod error;
mod helpers;
pub mod working_copy;

pub use error::{Error, Result};
pub use working_copy::{CommitInfo, WorkingCopy};
