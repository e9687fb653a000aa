//! Store/content layer contract
//!
//! Translation stores live in a database owned by the surrounding
//! application. The core only needs to enumerate them, read and write their
//! serialized content, and mark them obsolete.

mod memory;

pub use memory::MemoryStore;

use crate::Result;

/// Point-in-time view of one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Unique logical path of the store
    pub pootle_path: String,
    /// Highest revision among the store's units
    pub revision: u64,
    /// Obsolete stores are kept in the database but no longer exist
    pub obsolete: bool,
}

impl StoreSnapshot {
    pub fn exists(&self) -> bool {
        !self.obsolete
    }
}

/// Access to translation stores and their serialized content
pub trait TranslationStore {
    /// Every known store, obsolete ones included.
    fn list(&self) -> Result<Vec<StoreSnapshot>>;

    /// Look up a store by path, obsolete ones included.
    fn resolve(&self, pootle_path: &str) -> Result<Option<StoreSnapshot>>;

    /// Serialized content of a store.
    fn content(&self, pootle_path: &str) -> Result<Vec<u8>>;

    /// Replace a store's content through the normal edit path.
    ///
    /// Creates the store if it does not exist and revives it if obsolete.
    /// Returns the store's revision after the write.
    fn write_content(&mut self, pootle_path: &str, content: &[u8]) -> Result<u64>;

    /// Mark a store obsolete without deleting it.
    fn mark_obsolete(&mut self, pootle_path: &str) -> Result<()>;

    /// Check that `content` can be loaded into the store at `pootle_path`.
    ///
    /// Called before any backend content is written into a store.
    fn validate_content(&self, _pootle_path: &str, _content: &[u8]) -> Result<()> {
        Ok(())
    }
}
