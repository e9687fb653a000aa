//! Git working copy backend

use std::collections::BTreeSet;

use transync_fs::NormalizedPath;
use transync_git::WorkingCopy;

use super::{FsBackend, LocalFsBackend};
use crate::Result;

const COMMIT_MESSAGE: &str = "Translation sync from transync";

/// Backend over a git working copy
///
/// Files are read and written in the working tree. `pull` fast-forwards from
/// the remote; `push` commits every change and pushes the current branch.
#[derive(Debug, Clone)]
pub struct GitBackend {
    files: LocalFsBackend,
    working_copy: WorkingCopy,
}

impl GitBackend {
    pub const FS_TYPE: &'static str = "git";

    /// Open the working copy at `root`.
    pub fn open(root: NormalizedPath, url: impl Into<String>) -> Result<Self> {
        let working_copy = WorkingCopy::open(root.clone())?;
        Ok(Self {
            files: LocalFsBackend::new(root, url),
            working_copy,
        })
    }

    pub fn working_copy(&self) -> &WorkingCopy {
        &self.working_copy
    }
}

impl FsBackend for GitBackend {
    fn fs_type(&self) -> &'static str {
        Self::FS_TYPE
    }

    fn fs_url(&self) -> &str {
        self.files.fs_url()
    }

    fn list_paths(&self) -> Result<BTreeSet<String>> {
        self.files.list_paths()
    }

    fn exists(&self, path: &str) -> Result<bool> {
        self.files.exists(path)
    }

    fn fingerprint(&self, path: &str) -> Result<String> {
        self.files.fingerprint(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files.read(path)
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        self.files.write(path, content)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.files.delete(path)
    }

    fn pull(&self) -> Result<()> {
        let updated = self.working_copy.pull()?;
        tracing::debug!(root = %self.working_copy.root(), updated, "Pulled working copy");
        Ok(())
    }

    fn push(&self) -> Result<()> {
        match self.working_copy.commit_all(COMMIT_MESSAGE)? {
            Some(commit) => tracing::info!(commit = %commit.hash, "Committed translation changes"),
            None => tracing::debug!("Nothing to commit"),
        }
        // Earlier commits may still be unpublished after a failed push
        if self.working_copy.latest_hash()?.is_none() {
            return Ok(());
        }
        self.working_copy.push()?;
        Ok(())
    }
}
