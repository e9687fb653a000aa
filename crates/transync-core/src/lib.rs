//! Synchronization between translation stores and file backends
//!
//! This crate reconciles two independently mutable copies of the same
//! translation resource: a store with a monotonic revision counter, and a
//! file on a backend such as a git working copy. It provides:
//!
//! - **Tracking store**: persisted `StoreFs` rows pairing a store path with a
//!   backend path, carrying the last sync watermark and the staged action
//! - **State classifier**: maps every pairing to one [`FsStateKind`]
//! - **Action planner**: the `add`, `fetch`, `rm` and `merge` staging commands
//! - **Sync executor**: transfers content for staged pairings and records
//!   fresh watermarks
//! - **FsPlugin**: the per-project facade tying configuration, backend,
//!   locking and the steps above together
//!
//! # Architecture
//!
//! ```text
//!                  presentation layer
//!                          |
//!                    transync-core
//!                          |
//!               +----------+----------+
//!               |                     |
//!         transync-fs           transync-git
//! ```
//!
//! # Example
//!
//! ```ignore
//! use transync_core::{FsPlugin, MemoryStore, PathFilter};
//!
//! let mut plugin = FsPlugin::open("transync.toml", MemoryStore::new())?;
//! plugin.add(false, &PathFilter::all())?;
//! let response = plugin.sync(&PathFilter::all())?;
//! assert!(response.made_changes());
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod lock;
pub mod mapping;
pub mod plan;
pub mod plugin;
pub mod response;
pub mod state;
pub mod store;
pub mod sync;
pub mod tracking;

pub use backend::{FsBackend, GitBackend, LocalFsBackend, open_backend};
pub use config::{FsSection, ProjectConfig, ProjectSection, TrackingSection};
pub use error::{Error, Result};
pub use lock::ProjectLock;
pub use mapping::PathMapping;
pub use plan::ActionPlanner;
pub use plugin::{FsPlugin, ProjectInfo};
pub use response::{ActionType, Response, ResponseItem};
pub use state::{
    FileSnapshot, FsState, FsStateKind, PathFilter, State, classify_pairing, collect_state,
};
pub use store::{MemoryStore, StoreSnapshot, TranslationStore};
pub use sync::SyncExecutor;
pub use tracking::{Resolution, Stage, StoreFs, TrackingStore, Watermark};
