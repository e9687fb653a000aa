//! Pairing record between a store and a backend file
//!
//! A `StoreFs` row links a store path to a backend path. It carries the
//! watermark observed at the last successful sync and the action an
//! operator has staged for the next sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side wins when a staged merge is synced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Backend content replaces the store content
    FsWins,
    /// Store content replaces the backend file
    PootleWins,
}

/// Operator intent recorded on a pairing
///
/// Exactly one stage applies at a time, so a row can never be staged for
/// removal and for merge simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// No pending action; drift is derived from the watermark
    #[default]
    Tracked,
    /// The store side is to be pushed to the backend
    Add,
    /// The backend side is to be pulled into the store
    Fetch,
    /// Both sides are to be deleted along with the row
    Remove,
    /// A conflict is to be resolved in favour of one side
    Merge { resolution: Resolution },
}

/// Revision and fingerprint recorded at the last successful sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    /// Store revision after the sync
    pub revision: u64,
    /// Backend fingerprint after the sync
    pub hash: String,
    /// When the sync completed
    pub synced_at: DateTime<Utc>,
}

/// Tracking row pairing a store path with a backend path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFs {
    /// Store-side identity
    pub pootle_path: String,
    /// Backend-side identity
    pub fs_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
    #[serde(default)]
    pub stage: Stage,
}

impl StoreFs {
    /// Create an unsynced row with the given stage.
    pub fn new(pootle_path: impl Into<String>, fs_path: impl Into<String>, stage: Stage) -> Self {
        Self {
            pootle_path: pootle_path.into(),
            fs_path: fs_path.into(),
            watermark: None,
            stage,
        }
    }

    pub fn last_sync_revision(&self) -> Option<u64> {
        self.watermark.as_ref().map(|w| w.revision)
    }

    pub fn last_sync_hash(&self) -> Option<&str> {
        self.watermark.as_ref().map(|w| w.hash.as_str())
    }

    pub fn staged_for_removal(&self) -> bool {
        self.stage == Stage::Remove
    }

    pub fn staged_for_merge(&self) -> bool {
        matches!(self.stage, Stage::Merge { .. })
    }

    pub fn resolve_conflict(&self) -> Option<Resolution> {
        match self.stage {
            Stage::Merge { resolution } => Some(resolution),
            _ => None,
        }
    }

    /// Whether this row has completed at least one sync.
    pub fn is_synced(&self) -> bool {
        self.watermark.is_some()
    }

    /// Stage a push; the previous watermark no longer applies.
    pub fn stage_add(&mut self) {
        self.watermark = None;
        self.stage = Stage::Add;
    }

    /// Stage a pull; the previous watermark no longer applies.
    pub fn stage_fetch(&mut self) {
        self.watermark = None;
        self.stage = Stage::Fetch;
    }

    pub fn stage_remove(&mut self) {
        self.stage = Stage::Remove;
    }

    pub fn stage_merge(&mut self, resolution: Resolution) {
        self.stage = Stage::Merge { resolution };
    }

    /// Record a completed sync and clear any staged action.
    pub fn mark_synced(&mut self, revision: u64, hash: impl Into<String>) {
        self.watermark = Some(Watermark {
            revision,
            hash: hash.into(),
            synced_at: Utc::now(),
        });
        self.stage = Stage::Tracked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_has_no_watermark() {
        let row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", Stage::Add);
        assert_eq!(row.last_sync_revision(), None);
        assert_eq!(row.last_sync_hash(), None);
        assert!(!row.is_synced());
    }

    #[test]
    fn mark_synced_clears_merge_stage() {
        let mut row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", Stage::Tracked);
        row.stage_merge(Resolution::PootleWins);
        assert!(row.staged_for_merge());
        assert_eq!(row.resolve_conflict(), Some(Resolution::PootleWins));

        row.mark_synced(7, "sha256:abc");
        assert!(!row.staged_for_merge());
        assert_eq!(row.resolve_conflict(), None);
        assert_eq!(row.last_sync_revision(), Some(7));
        assert_eq!(row.last_sync_hash(), Some("sha256:abc"));
    }

    #[test]
    fn staging_removal_replaces_merge() {
        let mut row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", Stage::Tracked);
        row.stage_merge(Resolution::FsWins);
        row.stage_remove();
        assert!(row.staged_for_removal());
        assert!(!row.staged_for_merge());
    }

    #[test]
    fn stage_add_drops_watermark() {
        let mut row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", Stage::Tracked);
        row.mark_synced(3, "sha256:abc");
        row.stage_add();
        assert!(!row.is_synced());
        assert_eq!(row.stage, Stage::Add);
    }

    #[test]
    fn stage_serializes_with_kind_tag() {
        let mut row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", Stage::Tracked);
        row.stage_merge(Resolution::FsWins);

        let serialized = toml::to_string(&row).unwrap();
        assert!(serialized.contains("kind = \"merge\""), "got: {}", serialized);
        assert!(serialized.contains("resolution = \"fs_wins\""), "got: {}", serialized);

        let back: StoreFs = toml::from_str(&serialized).unwrap();
        assert_eq!(back, row);
    }
}
