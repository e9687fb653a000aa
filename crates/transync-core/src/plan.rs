//! Staging commands
//!
//! Each planner selects pairings by state and records the operator's intent
//! on their tracking rows. No file or store content is touched; the next
//! sync carries the staged actions out.

use crate::response::{ActionType, Response};
use crate::state::{FsState, FsStateKind, State};
use crate::tracking::{Resolution, Stage, StoreFs, TrackingStore};
use crate::{Error, Result};

/// States selected by `add`
pub const ADD_STATES: &[FsStateKind] = &[FsStateKind::PootleUntracked];

/// Additional states selected by `add --force`
pub const ADD_FORCE_STATES: &[FsStateKind] = &[
    FsStateKind::Conflict,
    FsStateKind::ConflictUntracked,
    FsStateKind::FsRemoved,
];

/// States selected by `fetch`
pub const FETCH_STATES: &[FsStateKind] = &[FsStateKind::FsUntracked];

/// Additional states selected by `fetch --force`
pub const FETCH_FORCE_STATES: &[FsStateKind] = &[
    FsStateKind::ConflictUntracked,
    FsStateKind::PootleRemoved,
    FsStateKind::Conflict,
];

/// States selected by `rm`
pub const RM_STATES: &[FsStateKind] = &[
    FsStateKind::FsUntracked,
    FsStateKind::PootleUntracked,
    FsStateKind::PootleRemoved,
    FsStateKind::FsRemoved,
];

/// States selected by `merge`
pub const MERGE_STATES: &[FsStateKind] = &[FsStateKind::ConflictUntracked, FsStateKind::Conflict];

/// Stages actions on the tracking rows of one project
pub struct ActionPlanner<'a> {
    tracking: &'a mut TrackingStore,
}

impl<'a> ActionPlanner<'a> {
    pub fn new(tracking: &'a mut TrackingStore) -> Self {
        Self { tracking }
    }

    /// Stage stores for pushing to the backend.
    pub fn add(&mut self, state: &State, force: bool) -> Result<Response> {
        let kinds = with_force(ADD_STATES, ADD_FORCE_STATES, force);
        self.stage(state, &kinds, ActionType::AddedFromPootle, Stage::Add)
    }

    /// Stage backend files for pulling into stores.
    pub fn fetch(&mut self, state: &State, force: bool) -> Result<Response> {
        let kinds = with_force(FETCH_STATES, FETCH_FORCE_STATES, force);
        self.stage(state, &kinds, ActionType::FetchedFromFs, Stage::Fetch)
    }

    /// Stage pairings for removal of both sides.
    pub fn rm(&mut self, state: &State) -> Result<Response> {
        self.stage(state, RM_STATES, ActionType::StagedForRemoval, Stage::Remove)
    }

    /// Stage conflicts for resolution in favour of one side.
    pub fn merge(&mut self, state: &State, pootle_wins: bool) -> Result<Response> {
        let (resolution, action) = if pootle_wins {
            (Resolution::PootleWins, ActionType::StagedForMergePootle)
        } else {
            (Resolution::FsWins, ActionType::StagedForMergeFs)
        };
        self.stage(state, MERGE_STATES, action, Stage::Merge { resolution })
    }

    fn stage(
        &mut self,
        state: &State,
        kinds: &[FsStateKind],
        action: ActionType,
        stage: Stage,
    ) -> Result<Response> {
        let mut response = Response::with_filtered(state.filtered());
        for fs_state in state.select(kinds) {
            match self.stage_one(fs_state, stage) {
                Ok(()) => {
                    tracing::debug!(
                        pootle_path = %fs_state.pootle_path,
                        fs_path = %fs_state.fs_path,
                        action = %action,
                        "Staged pairing"
                    );
                    response.add(action, fs_state.clone());
                }
                Err(e @ Error::PairingConflict { .. }) => {
                    tracing::warn!(pootle_path = %fs_state.pootle_path, error = %e, "Pairing rejected");
                    response.add_failure(action, fs_state.clone(), e);
                }
                Err(e) => return Err(e),
            }
        }
        self.tracking.persist()?;
        tracing::info!(action = %action, staged = response.len(), "Staging complete");
        Ok(response)
    }

    fn stage_one(&mut self, fs_state: &FsState, stage: Stage) -> Result<()> {
        let Some(row) = self.tracking.get_mut(&fs_state.pootle_path) else {
            return self.tracking.insert(StoreFs::new(
                fs_state.pootle_path.clone(),
                fs_state.fs_path.clone(),
                stage,
            ));
        };
        match stage {
            Stage::Tracked => {}
            Stage::Add => row.stage_add(),
            Stage::Fetch => row.stage_fetch(),
            Stage::Remove => row.stage_remove(),
            Stage::Merge { resolution } => row.stage_merge(resolution),
        }
        Ok(())
    }
}

fn with_force(base: &[FsStateKind], forced: &[FsStateKind], force: bool) -> Vec<FsStateKind> {
    let mut kinds = base.to_vec();
    if force {
        kinds.extend_from_slice(forced);
    }
    kinds
}
