//! Normalized path handling for backend roots and backend paths

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A filesystem path normalized to use forward slashes internally.
///
/// Converted to platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Resolve a backend path (`/en/foo.po`) below this root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathTraversal`] if the backend path contains `..`.
    pub fn join_backend(&self, backend_path: &str) -> Result<Self> {
        let normalized = normalize_backend_path(backend_path)?;
        Ok(self.join(normalized.trim_start_matches('/')))
    }

    /// Express `path` as a backend path relative to this root.
    ///
    /// Returns `None` if `path` is not below this root.
    pub fn backend_path_of(&self, path: &NormalizedPath) -> Option<String> {
        let root = self.inner.trim_end_matches('/');
        let rest = path.inner.strip_prefix(root)?;
        if !rest.starts_with('/') {
            return None;
        }
        normalize_backend_path(rest).ok()
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Normalize a backend path to the canonical `/a/b/c.po` form.
///
/// Backslashes become forward slashes, repeated and trailing separators are
/// collapsed, `.` segments are dropped and a leading `/` is added.
///
/// # Errors
///
/// Returns [`Error::PathTraversal`] if any segment is `..`.
pub fn normalize_backend_path(path: &str) -> Result<String> {
    let unified = path.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(Error::PathTraversal {
                    path: path.to_string(),
                });
            }
            s => segments.push(s),
        }
    }
    Ok(format!("/{}", segments.join("/")))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
