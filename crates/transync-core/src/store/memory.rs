//! In-memory translation store

use std::collections::BTreeMap;
use std::fmt;

use super::{StoreSnapshot, TranslationStore};
use crate::{Error, Result};

type Validator = Box<dyn Fn(&[u8]) -> std::result::Result<(), String> + Send + Sync>;

#[derive(Debug, Clone)]
struct Entry {
    content: Vec<u8>,
    revision: u64,
    obsolete: bool,
}

/// Translation stores held in memory
///
/// Revisions come from a single counter shared by all stores, so every edit
/// yields a revision higher than any seen before. Writing identical content
/// to a live store is not an edit and keeps its revision.
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Entry>,
    last_revision: u64,
    validator: Option<Validator>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject backend content for which `validator` returns an error.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&[u8]) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Seed a store, bumping its revision.
    pub fn insert(&mut self, pootle_path: &str, content: impl Into<Vec<u8>>) -> u64 {
        self.last_revision += 1;
        self.entries.insert(
            pootle_path.to_string(),
            Entry {
                content: content.into(),
                revision: self.last_revision,
                obsolete: false,
            },
        );
        self.last_revision
    }

    pub fn content_str(&self, pootle_path: &str) -> Option<String> {
        self.entries
            .get(pootle_path)
            .map(|e| String::from_utf8_lossy(&e.content).into_owned())
    }

    pub fn is_obsolete(&self, pootle_path: &str) -> Option<bool> {
        self.entries.get(pootle_path).map(|e| e.obsolete)
    }

    fn snapshot(pootle_path: &str, entry: &Entry) -> StoreSnapshot {
        StoreSnapshot {
            pootle_path: pootle_path.to_string(),
            revision: entry.revision,
            obsolete: entry.obsolete,
        }
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("stores", &self.entries.len())
            .field("last_revision", &self.last_revision)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl TranslationStore for MemoryStore {
    fn list(&self) -> Result<Vec<StoreSnapshot>> {
        Ok(self
            .entries
            .iter()
            .map(|(path, entry)| Self::snapshot(path, entry))
            .collect())
    }

    fn resolve(&self, pootle_path: &str) -> Result<Option<StoreSnapshot>> {
        Ok(self
            .entries
            .get(pootle_path)
            .map(|entry| Self::snapshot(pootle_path, entry)))
    }

    fn content(&self, pootle_path: &str) -> Result<Vec<u8>> {
        self.entries
            .get(pootle_path)
            .map(|e| e.content.clone())
            .ok_or_else(|| Error::StoreNotFound {
                pootle_path: pootle_path.to_string(),
            })
    }

    fn write_content(&mut self, pootle_path: &str, content: &[u8]) -> Result<u64> {
        if let Some(entry) = self.entries.get_mut(pootle_path) {
            if !entry.obsolete && entry.content == content {
                return Ok(entry.revision);
            }
            self.last_revision += 1;
            entry.content = content.to_vec();
            entry.revision = self.last_revision;
            entry.obsolete = false;
            return Ok(entry.revision);
        }
        Ok(self.insert(pootle_path, content))
    }

    fn mark_obsolete(&mut self, pootle_path: &str) -> Result<()> {
        let entry = self
            .entries
            .get_mut(pootle_path)
            .ok_or_else(|| Error::StoreNotFound {
                pootle_path: pootle_path.to_string(),
            })?;
        entry.obsolete = true;
        Ok(())
    }

    fn validate_content(&self, pootle_path: &str, content: &[u8]) -> Result<()> {
        match &self.validator {
            Some(validator) => validator(content).map_err(|reason| Error::InvalidContent {
                path: pootle_path.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
