//! Pairing states
//!
//! Every pairing candidate of a project is in exactly one [`FsStateKind`],
//! or in none when it is fully synced. [`State`] groups the classified
//! pairings by kind.

mod classifier;
mod filter;

pub use classifier::{FileSnapshot, classify_pairing, collect_state};
pub use filter::PathFilter;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::store::StoreSnapshot;
use crate::tracking::StoreFs;

/// Divergence state of one pairing
///
/// Variants are ordered in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsStateKind {
    FsUntracked,
    PootleUntracked,
    ConflictUntracked,
    FsStaged,
    PootleStaged,
    FsAhead,
    PootleAhead,
    Conflict,
    FsRemoved,
    PootleRemoved,
    MergeFsWins,
    MergePootleWins,
    Remove,
}

impl FsStateKind {
    pub const ALL: [FsStateKind; 13] = [
        Self::FsUntracked,
        Self::PootleUntracked,
        Self::ConflictUntracked,
        Self::FsStaged,
        Self::PootleStaged,
        Self::FsAhead,
        Self::PootleAhead,
        Self::Conflict,
        Self::FsRemoved,
        Self::PootleRemoved,
        Self::MergeFsWins,
        Self::MergePootleWins,
        Self::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FsUntracked => "fs_untracked",
            Self::PootleUntracked => "pootle_untracked",
            Self::ConflictUntracked => "conflict_untracked",
            Self::FsStaged => "fs_staged",
            Self::PootleStaged => "pootle_staged",
            Self::FsAhead => "fs_ahead",
            Self::PootleAhead => "pootle_ahead",
            Self::Conflict => "conflict",
            Self::FsRemoved => "fs_removed",
            Self::PootleRemoved => "pootle_removed",
            Self::MergeFsWins => "merge_fs_wins",
            Self::MergePootleWins => "merge_pootle_wins",
            Self::Remove => "remove",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FsUntracked => "Untracked files",
            Self::PootleUntracked => "Untracked Stores",
            Self::ConflictUntracked => "Untracked conflicts",
            Self::FsStaged => "Fetched from filesystem",
            Self::PootleStaged => "Added in Pootle",
            Self::FsAhead => "Files updated in filesystem",
            Self::PootleAhead => "Stores updated in Pootle",
            Self::Conflict => "Conflicts",
            Self::FsRemoved => "Removed from filesystem",
            Self::PootleRemoved => "Removed from Pootle",
            Self::MergeFsWins => "Staged for merge (FS wins)",
            Self::MergePootleWins => "Staged for merge (Pootle wins)",
            Self::Remove => "Staged for removal",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FsUntracked => "Newly created files in the filesystem",
            Self::PootleUntracked => "Newly created Stores in Pootle",
            Self::ConflictUntracked => {
                "Newly created files in the filesystem matching newly created Stores in Pootle"
            }
            Self::FsStaged => "Files that have been fetched and will be pulled into Pootle on sync",
            Self::PootleStaged => "Stores that have been added and will be pushed to the filesystem on sync",
            Self::FsAhead => "Files that have changed in the filesystem since the last sync",
            Self::PootleAhead => "Stores that have changed in Pootle since the last sync",
            Self::Conflict => "Both the Store and the file have changed since the last sync",
            Self::FsRemoved => "Files that have been removed from the filesystem since the last sync",
            Self::PootleRemoved => "Stores that have been removed from Pootle since the last sync",
            Self::MergeFsWins => "Conflicts staged for resolution with the file content on sync",
            Self::MergePootleWins => "Conflicts staged for resolution with the Store content on sync",
            Self::Remove => "Files and Stores that will be removed on sync",
        }
    }

    /// Whether the pairing has a tracking row in this state
    pub fn is_tracked(&self) -> bool {
        !matches!(
            self,
            Self::FsUntracked | Self::PootleUntracked | Self::ConflictUntracked
        )
    }
}

impl fmt::Display for FsStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified pairing
#[derive(Debug, Clone, PartialEq)]
pub struct FsState {
    pub kind: FsStateKind,
    pub pootle_path: String,
    pub fs_path: String,
    /// Tracking row, absent for untracked pairings
    pub store_fs: Option<StoreFs>,
    /// Store snapshot, obsolete stores included
    pub store: Option<StoreSnapshot>,
    pub fs_exists: bool,
}

impl FsState {
    pub fn store_exists(&self) -> bool {
        self.store.as_ref().is_some_and(StoreSnapshot::exists)
    }
}

/// Classified pairings of one project grouped by kind
#[derive(Debug, Clone, Default)]
pub struct State {
    groups: BTreeMap<FsStateKind, Vec<FsState>>,
    filtered: usize,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, state: FsState) {
        let group = self.groups.entry(state.kind).or_default();
        let at = group.partition_point(|s| s.pootle_path < state.pootle_path);
        group.insert(at, state);
    }

    pub(crate) fn record_filtered(&mut self) {
        self.filtered += 1;
    }

    /// Entries of one kind ordered by `pootle_path`
    pub fn get(&self, kind: FsStateKind) -> &[FsState] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds with at least one entry, in reporting order
    pub fn kinds(&self) -> impl Iterator<Item = FsStateKind> + '_ {
        self.groups.keys().copied()
    }

    /// Every entry, grouped in reporting order
    pub fn iter(&self) -> impl Iterator<Item = &FsState> {
        self.groups.values().flatten()
    }

    /// Entries of the given kinds, in reporting order
    pub fn select(&self, kinds: &[FsStateKind]) -> Vec<&FsState> {
        self.groups
            .iter()
            .filter(|(kind, _)| kinds.contains(kind))
            .flat_map(|(_, states)| states.iter())
            .collect()
    }

    /// Find the entry for a store path
    pub fn find(&self, pootle_path: &str) -> Option<&FsState> {
        self.iter().find(|s| s.pootle_path == pootle_path)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `false` when everything is up to date
    pub fn has_changed(&self) -> bool {
        !self.is_empty()
    }

    /// Pairings that had a state but were excluded by the path filter
    pub fn filtered(&self) -> usize {
        self.filtered
    }
}

impl Index<FsStateKind> for State {
    type Output = [FsState];

    fn index(&self, kind: FsStateKind) -> &Self::Output {
        self.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(kind: FsStateKind, pootle_path: &str) -> FsState {
        FsState {
            kind,
            pootle_path: pootle_path.to_string(),
            fs_path: String::new(),
            store_fs: None,
            store: None,
            fs_exists: false,
        }
    }

    #[test]
    fn groups_are_sorted_by_pootle_path() {
        let mut state = State::new();
        state.push(entry(FsStateKind::FsUntracked, "/en/proj/b.po"));
        state.push(entry(FsStateKind::FsUntracked, "/en/proj/a.po"));
        state.push(entry(FsStateKind::Conflict, "/en/proj/c.po"));

        let paths: Vec<&str> = state[FsStateKind::FsUntracked]
            .iter()
            .map(|s| s.pootle_path.as_str())
            .collect();
        assert_eq!(paths, vec!["/en/proj/a.po", "/en/proj/b.po"]);
        assert_eq!(state.len(), 3);
        assert!(state.has_changed());
    }

    #[test]
    fn kinds_follow_reporting_order() {
        let mut state = State::new();
        state.push(entry(FsStateKind::Remove, "/en/proj/a.po"));
        state.push(entry(FsStateKind::FsUntracked, "/en/proj/b.po"));
        let kinds: Vec<FsStateKind> = state.kinds().collect();
        assert_eq!(kinds, vec![FsStateKind::FsUntracked, FsStateKind::Remove]);
    }

    #[test]
    fn empty_state_has_not_changed() {
        let mut state = State::new();
        state.record_filtered();
        assert!(!state.has_changed());
        assert_eq!(state.filtered(), 1);
        assert!(state[FsStateKind::Conflict].is_empty());
    }

    #[test]
    fn tag_strings_are_unique() {
        let mut tags: Vec<&str> = FsStateKind::ALL.iter().map(FsStateKind::as_str).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 13);
    }
}
