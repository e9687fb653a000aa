//! Per-project mutual exclusion

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

const LOCK_FILE: &str = "project.lock";

/// Exclusive lock on a project's state directory
///
/// Held for the duration of one command and released on drop. The lock is
/// advisory and works across processes.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl ProjectLock {
    /// Block until the lock for `state_dir` is acquired.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let (file, path) = Self::open(state_dir)?;
        file.lock_exclusive().map_err(|e| Error::Tracking {
            message: format!("Failed to lock {}: {}", path.display(), e),
        })?;
        tracing::trace!(path = %path.display(), "Acquired project lock");
        Ok(Self { file, path })
    }

    /// Acquire the lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] if another holder has it.
    pub fn try_acquire(state_dir: &Path) -> Result<Self> {
        let (file, path) = Self::open(state_dir)?;
        if file.try_lock_exclusive().is_err() {
            return Err(Error::Locked { path });
        }
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(state_dir: &Path) -> Result<(File, PathBuf)> {
        fs::create_dir_all(state_dir)?;
        let path = state_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Ok((file, path))
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release project lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_holder_is_rejected() {
        let temp = TempDir::new().unwrap();
        let _held = ProjectLock::acquire(temp.path()).unwrap();
        let err = ProjectLock::try_acquire(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Locked { .. }));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let temp = TempDir::new().unwrap();
        drop(ProjectLock::acquire(temp.path()).unwrap());
        assert!(ProjectLock::try_acquire(temp.path()).is_ok());
    }
}
