//! Tracking store for pairing records
//!
//! The tracking store is the only core-owned mutable state: every
//! [`StoreFs`] row of a project. It is persisted as TOML and enforces that
//! each store path and each backend path is paired at most once.

mod store_fs;

pub use store_fs::{Resolution, Stage, StoreFs, Watermark};

use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

/// All pairing rows of one project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingStore {
    /// Format version for forward compatibility
    version: String,
    /// Rows ordered by `pootle_path`
    #[serde(default, rename = "store_fs")]
    rows: Vec<StoreFs>,
    /// File this store persists to, if any
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl TrackingStore {
    /// Create a new, unpersisted, empty tracking store
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            rows: Vec::new(),
            path: None,
        }
    }

    /// Load a tracking store from a TOML file with shared lock
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;

        // Read through the locked handle
        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        let mut store: TrackingStore = toml::from_str(&content)?;
        store.rows.sort_by(|a, b| a.pootle_path.cmp(&b.pootle_path));
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Load the store at `path`, or start an empty one bound to `path`
    pub fn open(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let mut store = Self::new();
            store.path = Some(path.to_path_buf());
            Ok(store)
        }
    }

    /// Save the tracking store to a TOML file atomically with exclusive lock
    ///
    /// Uses write-to-temp-then-rename with file locking.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Save to the bound path; a no-op for unpersisted stores
    pub fn persist(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save(path),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All rows, ordered by `pootle_path`
    pub fn rows(&self) -> &[StoreFs] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, pootle_path: &str) -> Option<&StoreFs> {
        self.rows.iter().find(|r| r.pootle_path == pootle_path)
    }

    pub fn get_mut(&mut self, pootle_path: &str) -> Option<&mut StoreFs> {
        self.rows.iter_mut().find(|r| r.pootle_path == pootle_path)
    }

    pub fn get_by_fs_path(&self, fs_path: &str) -> Option<&StoreFs> {
        self.rows.iter().find(|r| r.fs_path == fs_path)
    }

    /// Add a row, keeping the pairing unique on both sides
    ///
    /// # Errors
    ///
    /// Returns [`Error::PairingConflict`] if either path is already tracked;
    /// the existing row is left unchanged.
    pub fn insert(&mut self, row: StoreFs) -> Result<()> {
        let existing = self
            .get(&row.pootle_path)
            .or_else(|| self.get_by_fs_path(&row.fs_path));
        if let Some(existing) = existing {
            return Err(Error::PairingConflict {
                pootle_path: row.pootle_path,
                fs_path: row.fs_path,
                existing: format!("{} <--> {}", existing.pootle_path, existing.fs_path),
            });
        }
        let pos = self
            .rows
            .partition_point(|r| r.pootle_path < row.pootle_path);
        self.rows.insert(pos, row);
        Ok(())
    }

    /// Remove the row for `pootle_path`
    ///
    /// Returns the removed row if found, None otherwise.
    pub fn remove(&mut self, pootle_path: &str) -> Option<StoreFs> {
        let pos = self.rows.iter().position(|r| r.pootle_path == pootle_path)?;
        Some(self.rows.remove(pos))
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
