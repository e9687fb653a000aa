//! Filesystem primitives for transync
//!
//! Provides normalized path handling, content fingerprints and safe I/O
//! used by the backend adapters and the tracking store.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{compute_checksum, compute_file_checksum};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, normalize_backend_path};
