//! Error types for transync-core

use std::path::PathBuf;

/// Result type for transync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in transync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The project manifest has no usable `[fs]` section
    #[error("Project is not configured for FS sync: {path}")]
    NotConfigured { path: PathBuf },

    /// The configured backend type is not registered
    #[error("Unrecognised FS type: {fs_type}")]
    UnknownBackend { fs_type: String },

    /// A path mapping template cannot be used
    #[error("Invalid path mapping '{template}': {reason}")]
    InvalidMapping { template: String, reason: String },

    /// A second tracking row was requested for an already tracked path
    #[error("Cannot pair {pootle_path} with {fs_path}: {existing} is already tracked")]
    PairingConflict {
        pootle_path: String,
        fs_path: String,
        existing: String,
    },

    /// No tracking row exists for the path
    #[error("Not tracked: {pootle_path}")]
    NotTracked { pootle_path: String },

    /// A backend primitive failed for one path
    #[error("Backend error for {path}: {message}")]
    Backend { path: String, message: String },

    /// The store layer has no store at the path
    #[error("Store not found: {pootle_path}")]
    StoreNotFound { pootle_path: String },

    /// Backend content was rejected by the store layer
    #[error("Invalid content for {path}: {reason}")]
    InvalidContent { path: String, reason: String },

    /// Tracking store persistence or locking failure
    #[error("Tracking store error: {message}")]
    Tracking { message: String },

    /// Another process holds the project lock
    #[error("Project is locked by another operation: {path}")]
    Locked { path: PathBuf },

    /// Invalid path filter pattern
    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Filesystem error from transync-fs
    #[error(transparent)]
    Fs(#[from] transync_fs::Error),

    /// Git error from transync-git
    #[error(transparent)]
    Git(#[from] transync_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
