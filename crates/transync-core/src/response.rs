//! Command responses
//!
//! Planners and the sync executor report what they did as [`ResponseItem`]s
//! grouped by [`ActionType`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::FsState;

/// Outcome category of a response item
///
/// Variants are ordered in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    AddedFromPootle,
    FetchedFromFs,
    StagedForRemoval,
    StagedForMergeFs,
    StagedForMergePootle,
    PulledToPootle,
    PushedToFs,
    Removed,
    MergedFromFs,
    MergedFromPootle,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddedFromPootle => "added_from_pootle",
            Self::FetchedFromFs => "fetched_from_fs",
            Self::StagedForRemoval => "staged_for_removal",
            Self::StagedForMergeFs => "staged_for_merge_fs",
            Self::StagedForMergePootle => "staged_for_merge_pootle",
            Self::PulledToPootle => "pulled_to_pootle",
            Self::PushedToFs => "pushed_to_fs",
            Self::Removed => "removed",
            Self::MergedFromFs => "merged_from_fs",
            Self::MergedFromPootle => "merged_from_pootle",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::AddedFromPootle => "Stores added",
            Self::FetchedFromFs => "Files fetched",
            Self::StagedForRemoval => "Staged for removal",
            Self::StagedForMergeFs => "Staged for merge (FS wins)",
            Self::StagedForMergePootle => "Staged for merge (Pootle wins)",
            Self::PulledToPootle => "Pulled to Pootle",
            Self::PushedToFs => "Pushed to filesystem",
            Self::Removed => "Removed",
            Self::MergedFromFs => "Merged from filesystem",
            Self::MergedFromPootle => "Merged from Pootle",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::AddedFromPootle => "Stores that will be pushed to the filesystem on sync",
            Self::FetchedFromFs => "Files that will be pulled into Pootle on sync",
            Self::StagedForRemoval => "Files and Stores that will be removed on sync",
            Self::StagedForMergeFs => "Conflicts that will be resolved with the file content on sync",
            Self::StagedForMergePootle => "Conflicts that will be resolved with the Store content on sync",
            Self::PulledToPootle => "Stores updated with content from the filesystem",
            Self::PushedToFs => "Files updated with content from Pootle",
            Self::Removed => "Files and Stores removed",
            Self::MergedFromFs => "Conflicts resolved with the file content",
            Self::MergedFromPootle => "Conflicts resolved with the Store content",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One processed pairing
#[derive(Debug, Clone)]
pub struct ResponseItem {
    pub action: ActionType,
    /// The pairing as classified before the action
    pub fs_state: FsState,
    /// Failure message; `None` when the action completed
    pub error: Option<String>,
}

impl ResponseItem {
    pub fn completed(&self) -> bool {
        self.error.is_none()
    }

    pub fn pootle_path(&self) -> &str {
        &self.fs_state.pootle_path
    }

    pub fn fs_path(&self) -> &str {
        &self.fs_state.fs_path
    }
}

/// Items processed by one command, grouped by action
#[derive(Debug, Clone, Default)]
pub struct Response {
    groups: BTreeMap<ActionType, Vec<ResponseItem>>,
    filtered: usize,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_filtered(filtered: usize) -> Self {
        Self {
            filtered,
            ..Self::default()
        }
    }

    pub fn add(&mut self, action: ActionType, fs_state: FsState) {
        self.push(ResponseItem {
            action,
            fs_state,
            error: None,
        });
    }

    pub fn add_failure(&mut self, action: ActionType, fs_state: FsState, error: impl ToString) {
        self.push(ResponseItem {
            action,
            fs_state,
            error: Some(error.to_string()),
        });
    }

    fn push(&mut self, item: ResponseItem) {
        self.groups.entry(item.action).or_default().push(item);
    }

    /// Items of one action, in processing order
    pub fn get(&self, action: ActionType) -> &[ResponseItem] {
        self.groups.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn completed(&self, action: ActionType) -> Vec<&ResponseItem> {
        self.get(action).iter().filter(|i| i.completed()).collect()
    }

    pub fn failed(&self, action: ActionType) -> Vec<&ResponseItem> {
        self.get(action).iter().filter(|i| !i.completed()).collect()
    }

    /// Actions with at least one item, in reporting order
    pub fn action_types(&self) -> impl Iterator<Item = ActionType> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponseItem> {
        self.groups.values().flatten()
    }

    /// Whether any item completed
    pub fn made_changes(&self) -> bool {
        self.iter().any(ResponseItem::completed)
    }

    pub fn has_failures(&self) -> bool {
        self.iter().any(|i| !i.completed())
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Pairings excluded by the path filter
    pub fn filtered(&self) -> usize {
        self.filtered
    }
}
