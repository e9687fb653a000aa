//! Per-item sync execution

use transync_fs::compute_checksum;

use super::{SYNC_STEPS, Transfer};
use crate::backend::FsBackend;
use crate::response::Response;
use crate::state::{FsState, State};
use crate::store::TranslationStore;
use crate::tracking::TrackingStore;
use crate::{Error, Result};

/// Applies one sync pass over a classified state
///
/// Items are independent: a failing item is reported on the response and
/// left exactly as classified, while completed items stay committed. The
/// tracking store is persisted after every completed item.
pub struct SyncExecutor<'a, S: TranslationStore + ?Sized> {
    backend: &'a dyn FsBackend,
    stores: &'a mut S,
    tracking: &'a mut TrackingStore,
}

impl<'a, S: TranslationStore + ?Sized> SyncExecutor<'a, S> {
    pub fn new(backend: &'a dyn FsBackend, stores: &'a mut S, tracking: &'a mut TrackingStore) -> Self {
        Self {
            backend,
            stores,
            tracking,
        }
    }

    /// Process every actionable pairing of `state`.
    ///
    /// # Errors
    ///
    /// Only a failure to persist the tracking store aborts the pass.
    pub fn execute(&mut self, state: &State) -> Result<Response> {
        let mut response = Response::with_filtered(state.filtered());

        for (kinds, action, transfer) in SYNC_STEPS {
            let mut items = state.select(kinds);
            items.sort_by(|a, b| a.pootle_path.cmp(&b.pootle_path));

            for fs_state in items {
                let outcome = match transfer {
                    Transfer::Pull => self.pull(fs_state),
                    Transfer::Push => self.push(fs_state),
                    Transfer::Remove => self.remove(fs_state),
                };
                match outcome {
                    Ok(()) => {
                        self.tracking.persist()?;
                        tracing::info!(
                            pootle_path = %fs_state.pootle_path,
                            fs_path = %fs_state.fs_path,
                            action = %action,
                            "Synced pairing"
                        );
                        response.add(*action, fs_state.clone());
                    }
                    Err(e) => {
                        tracing::warn!(
                            pootle_path = %fs_state.pootle_path,
                            fs_path = %fs_state.fs_path,
                            action = %action,
                            error = %e,
                            "Sync failed for pairing"
                        );
                        response.add_failure(*action, fs_state.clone(), e);
                    }
                }
            }
        }

        Ok(response)
    }

    fn pull(&mut self, fs_state: &FsState) -> Result<()> {
        let content = self.backend.read(&fs_state.fs_path)?;
        self.stores.validate_content(&fs_state.pootle_path, &content)?;
        let hash = compute_checksum(&content);
        let revision = self.stores.write_content(&fs_state.pootle_path, &content)?;
        self.record_synced(fs_state, revision, hash)
    }

    fn push(&mut self, fs_state: &FsState) -> Result<()> {
        let content = self.stores.content(&fs_state.pootle_path)?;
        let revision = self
            .stores
            .resolve(&fs_state.pootle_path)?
            .map(|s| s.revision)
            .ok_or_else(|| Error::StoreNotFound {
                pootle_path: fs_state.pootle_path.clone(),
            })?;
        let hash = compute_checksum(&content);
        self.backend.write(&fs_state.fs_path, &content)?;
        self.record_synced(fs_state, revision, hash)
    }

    fn remove(&mut self, fs_state: &FsState) -> Result<()> {
        let live = self
            .stores
            .resolve(&fs_state.pootle_path)?
            .is_some_and(|s| s.exists());
        if live {
            self.stores.mark_obsolete(&fs_state.pootle_path)?;
        }
        if self.backend.exists(&fs_state.fs_path)? {
            self.backend.delete(&fs_state.fs_path)?;
        }
        self.tracking.remove(&fs_state.pootle_path);
        Ok(())
    }

    fn record_synced(&mut self, fs_state: &FsState, revision: u64, hash: String) -> Result<()> {
        let row = self
            .tracking
            .get_mut(&fs_state.pootle_path)
            .ok_or_else(|| Error::NotTracked {
                pootle_path: fs_state.pootle_path.clone(),
            })?;
        row.mark_synced(revision, hash);
        Ok(())
    }
}
