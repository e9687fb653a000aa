//! File backend abstraction
//!
//! A backend holds the file side of every pairing. Paths are backend paths in
//! the canonical `/a/b/c.po` form, relative to the backend root.

mod git;
mod local;

pub use git::GitBackend;
pub use local::LocalFsBackend;

use std::collections::BTreeSet;
use std::path::Path;

use transync_fs::NormalizedPath;

use crate::config::FsSection;
use crate::{Error, Result};

/// Registered backend types
pub const FS_TYPES: &[&str] = &[LocalFsBackend::FS_TYPE, GitBackend::FS_TYPE];

/// Trait for file-oriented backends.
///
/// [`pull`](Self::pull) and [`push`](Self::push) refresh the whole working
/// copy from and to its upstream. They run once per command, around the
/// per-file primitives.
pub trait FsBackend: Send + Sync {
    /// Registered type name of this backend
    fn fs_type(&self) -> &'static str;

    /// Location the backend was opened from
    fn fs_url(&self) -> &str;

    /// Enumerate every file below the backend root.
    fn list_paths(&self) -> Result<BTreeSet<String>>;

    fn exists(&self, path: &str) -> Result<bool>;

    /// Content fingerprint of the file at `path`.
    fn fingerprint(&self, path: &str) -> Result<String>;

    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Write `content` to `path`, creating parent directories.
    fn write(&self, path: &str, content: &[u8]) -> Result<()>;

    /// Delete the file at `path`. Deleting a missing file is not an error.
    fn delete(&self, path: &str) -> Result<()>;

    /// Bring the working copy up to date with upstream.
    fn pull(&self) -> Result<()>;

    /// Publish local changes upstream.
    fn push(&self) -> Result<()>;
}

/// Open the backend described by `fs`.
///
/// Relative URLs resolve against `base_dir`, normally the manifest directory.
///
/// # Errors
///
/// Returns [`Error::UnknownBackend`] if the type is not registered.
pub fn open_backend(fs: &FsSection, base_dir: &Path) -> Result<Box<dyn FsBackend>> {
    let root = resolve_url(&fs.url, base_dir);
    tracing::debug!(fs_type = %fs.fs_type, root = %root, "Opening backend");
    match fs.fs_type.as_str() {
        LocalFsBackend::FS_TYPE => Ok(Box::new(LocalFsBackend::new(root, &fs.url))),
        GitBackend::FS_TYPE => Ok(Box::new(GitBackend::open(root, &fs.url)?)),
        other => Err(Error::UnknownBackend {
            fs_type: other.to_string(),
        }),
    }
}

fn resolve_url(url: &str, base_dir: &Path) -> NormalizedPath {
    let path = Path::new(url);
    if path.is_absolute() {
        NormalizedPath::new(path)
    } else {
        NormalizedPath::new(base_dir.join(path))
    }
}
