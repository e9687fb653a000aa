//! Error types for transync-git

use std::path::PathBuf;

/// Result type for transync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in transync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] transync_fs::Error),

    #[error("Not a git working copy: {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("HEAD is detached; cannot determine the branch to sync")]
    DetachedHead,

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Cannot fast-forward: {message}")]
    CannotFastForward { message: String },
}
