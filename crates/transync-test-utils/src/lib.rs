//! Shared test utilities for the transync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - bare remotes and clones built with `git2`
//! - [`project`] - [`project::TestProject`], a temporary project with a
//!   manifest and a translations directory

pub mod git;
pub mod project;
