//! State classification
//!
//! [`classify_pairing`] is the pure decision over one pairing.
//! [`collect_state`] gathers the candidates of a project (every tracking row,
//! every untracked live store, every untracked backend file) and classifies
//! each of them.

use std::collections::{BTreeMap, BTreeSet};

use super::{FsState, FsStateKind, PathFilter, State};
use crate::backend::FsBackend;
use crate::mapping::PathMapping;
use crate::store::{StoreSnapshot, TranslationStore};
use crate::tracking::{Resolution, Stage, StoreFs, TrackingStore};
use crate::Result;

/// Observed backend file of a pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub fs_path: String,
    /// Current fingerprint; only computed when a watermark needs comparing
    pub fingerprint: Option<String>,
}

impl FileSnapshot {
    pub fn new(fs_path: impl Into<String>, fingerprint: Option<String>) -> Self {
        Self {
            fs_path: fs_path.into(),
            fingerprint,
        }
    }
}

/// Classify one pairing.
///
/// `store` may be an obsolete store, which counts as absent. Returns `None`
/// when the pairing is fully synced or has nothing on either side.
pub fn classify_pairing(
    store_fs: Option<&StoreFs>,
    store: Option<&StoreSnapshot>,
    file: Option<&FileSnapshot>,
) -> Option<FsStateKind> {
    let live = store.filter(|s| s.exists());
    let Some(row) = store_fs else {
        return match (live, file) {
            (Some(_), Some(_)) => Some(FsStateKind::ConflictUntracked),
            (Some(_), None) => Some(FsStateKind::PootleUntracked),
            (None, Some(_)) => Some(FsStateKind::FsUntracked),
            (None, None) => None,
        };
    };

    // Staged intent wins over drift
    match row.stage {
        Stage::Remove => return Some(FsStateKind::Remove),
        Stage::Merge { resolution } => {
            return Some(match resolution {
                Resolution::FsWins => FsStateKind::MergeFsWins,
                Resolution::PootleWins => FsStateKind::MergePootleWins,
            });
        }
        _ => {}
    }

    // Both sides gone: the row only awaits cleanup
    if live.is_none() && file.is_none() {
        return Some(FsStateKind::Remove);
    }

    match row.stage {
        Stage::Add if live.is_some() => return Some(FsStateKind::PootleStaged),
        Stage::Add => return Some(FsStateKind::FsStaged),
        Stage::Fetch if file.is_some() => return Some(FsStateKind::FsStaged),
        Stage::Fetch => return Some(FsStateKind::PootleStaged),
        _ => {}
    }

    let Some(watermark) = &row.watermark else {
        return match (live, file) {
            (Some(_), None) => Some(FsStateKind::PootleStaged),
            (None, Some(_)) => Some(FsStateKind::FsStaged),
            _ => Some(FsStateKind::Conflict),
        };
    };

    match (live, file) {
        (Some(_), None) => Some(FsStateKind::FsRemoved),
        (None, Some(_)) => Some(FsStateKind::PootleRemoved),
        (Some(store), Some(file)) => {
            let store_changed = store.revision != watermark.revision;
            let file_changed = file.fingerprint.as_deref() != Some(watermark.hash.as_str());
            match (store_changed, file_changed) {
                (false, false) => None,
                (false, true) => Some(FsStateKind::FsAhead),
                (true, false) => Some(FsStateKind::PootleAhead),
                (true, true) => Some(FsStateKind::Conflict),
            }
        }
        (None, None) => Some(FsStateKind::Remove),
    }
}

struct Candidate {
    pootle_path: String,
    fs_path: String,
    store_fs: Option<StoreFs>,
    store: Option<StoreSnapshot>,
    file: Option<FileSnapshot>,
}

/// Classify every pairing candidate of a project.
///
/// A tracked file whose fingerprint cannot be read is left out of the state
/// and logged; it is classified again on the next call.
///
/// # Errors
///
/// Listing the stores or the backend aborts the whole collection.
pub fn collect_state<S>(
    tracking: &TrackingStore,
    stores: &S,
    backend: &dyn FsBackend,
    mapping: &PathMapping,
    filter: &PathFilter,
) -> Result<State>
where
    S: TranslationStore + ?Sized,
{
    let stores: BTreeMap<String, StoreSnapshot> = stores
        .list()?
        .into_iter()
        .map(|s| (s.pootle_path.clone(), s))
        .collect();
    let fs_paths = backend.list_paths()?;

    let mut seen_pootle = BTreeSet::new();
    let mut seen_fs = BTreeSet::new();
    let mut candidates = Vec::new();

    for row in tracking.rows() {
        seen_pootle.insert(row.pootle_path.clone());
        seen_fs.insert(row.fs_path.clone());

        let file = if fs_paths.contains(&row.fs_path) {
            let fingerprint = match row.watermark {
                Some(_) => match backend.fingerprint(&row.fs_path) {
                    Ok(hash) => Some(hash),
                    // Unreadable file: skip this pairing and keep classifying the rest
                    Err(e) => {
                        tracing::warn!(
                            pootle_path = %row.pootle_path,
                            fs_path = %row.fs_path,
                            error = %e,
                            "Could not fingerprint file, skipping pairing"
                        );
                        continue;
                    }
                },
                None => None,
            };
            Some(FileSnapshot::new(row.fs_path.clone(), fingerprint))
        } else {
            None
        };
        candidates.push(Candidate {
            pootle_path: row.pootle_path.clone(),
            fs_path: row.fs_path.clone(),
            store_fs: Some(row.clone()),
            store: stores.get(&row.pootle_path).cloned(),
            file,
        });
    }

    for store in stores.values().filter(|s| s.exists()) {
        if seen_pootle.contains(&store.pootle_path) {
            continue;
        }
        let Some(fs_path) = mapping.pootle_to_fs(&store.pootle_path) else {
            tracing::trace!(pootle_path = %store.pootle_path, "Store has no backend mapping");
            continue;
        };
        if seen_fs.contains(&fs_path) {
            continue;
        }
        seen_pootle.insert(store.pootle_path.clone());
        seen_fs.insert(fs_path.clone());
        let file = fs_paths
            .contains(&fs_path)
            .then(|| FileSnapshot::new(fs_path.clone(), None));
        candidates.push(Candidate {
            pootle_path: store.pootle_path.clone(),
            fs_path,
            store_fs: None,
            store: Some(store.clone()),
            file,
        });
    }

    for fs_path in &fs_paths {
        if seen_fs.contains(fs_path) {
            continue;
        }
        let Some(pootle_path) = mapping.fs_to_pootle(fs_path) else {
            tracing::trace!(fs_path = %fs_path, "File does not match the translation mapping");
            continue;
        };
        if seen_pootle.contains(&pootle_path) {
            continue;
        }
        let store = stores.get(&pootle_path).cloned();
        if store.as_ref().is_some_and(StoreSnapshot::exists) {
            continue;
        }
        seen_pootle.insert(pootle_path.clone());
        candidates.push(Candidate {
            pootle_path,
            fs_path: fs_path.clone(),
            store_fs: None,
            store,
            file: Some(FileSnapshot::new(fs_path.clone(), None)),
        });
    }

    let mut state = State::new();
    for candidate in candidates {
        let Some(kind) = classify_pairing(
            candidate.store_fs.as_ref(),
            candidate.store.as_ref(),
            candidate.file.as_ref(),
        ) else {
            continue;
        };
        if !filter.matches(&candidate.pootle_path, &candidate.fs_path) {
            state.record_filtered();
            continue;
        }
        tracing::debug!(
            pootle_path = %candidate.pootle_path,
            fs_path = %candidate.fs_path,
            state = %kind,
            "Classified pairing"
        );
        state.push(FsState {
            kind,
            pootle_path: candidate.pootle_path,
            fs_path: candidate.fs_path,
            fs_exists: candidate.file.is_some(),
            store_fs: candidate.store_fs,
            store: candidate.store,
        });
    }
    Ok(state)
}
