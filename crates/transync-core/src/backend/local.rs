//! Plain directory backend

use std::collections::BTreeSet;

use transync_fs::{NormalizedPath, compute_file_checksum, io};

use super::FsBackend;
use crate::{Error, Result};

/// Backend rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFsBackend {
    root: NormalizedPath,
    url: String,
}

impl LocalFsBackend {
    pub const FS_TYPE: &'static str = "localfs";

    pub fn new(root: NormalizedPath, url: impl Into<String>) -> Self {
        Self {
            root,
            url: url.into(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<NormalizedPath> {
        Ok(self.root.join_backend(path)?)
    }

    fn require_file(&self, path: &str) -> Result<NormalizedPath> {
        let native = self.resolve(path)?;
        if !native.is_file() {
            return Err(Error::Backend {
                path: path.to_string(),
                message: "file does not exist".to_string(),
            });
        }
        Ok(native)
    }
}

impl FsBackend for LocalFsBackend {
    fn fs_type(&self) -> &'static str {
        Self::FS_TYPE
    }

    fn fs_url(&self) -> &str {
        &self.url
    }

    fn list_paths(&self) -> Result<BTreeSet<String>> {
        let paths = io::list_files(&self.root)?
            .iter()
            .filter_map(|file| self.root.backend_path_of(file))
            .collect();
        Ok(paths)
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }

    fn fingerprint(&self, path: &str) -> Result<String> {
        let native = self.require_file(path)?;
        Ok(compute_file_checksum(native.as_ref())?)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let native = self.require_file(path)?;
        Ok(io::read_bytes(&native)?)
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let native = self.resolve(path)?;
        io::write_atomic(&native, content)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let native = self.resolve(path)?;
        io::remove_file(&native)?;
        Ok(())
    }

    fn pull(&self) -> Result<()> {
        Ok(())
    }

    fn push(&self) -> Result<()> {
        Ok(())
    }
}
