//! Per-project façade
//!
//! [`FsPlugin`] ties a project's manifest, backend, tracking store and
//! translation stores together and exposes the operator commands. Every
//! command holds the project lock for its whole duration and starts by
//! pulling the backend.

use std::path::{Path, PathBuf};

use crate::backend::{FsBackend, open_backend};
use crate::config::ProjectConfig;
use crate::lock::ProjectLock;
use crate::mapping::PathMapping;
use crate::plan::ActionPlanner;
use crate::response::Response;
use crate::state::{PathFilter, State, collect_state};
use crate::store::TranslationStore;
use crate::sync::SyncExecutor;
use crate::tracking::TrackingStore;
use crate::{Error, Result};

const TRACKING_FILE: &str = "tracking.toml";

/// Summary of a project's backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub code: String,
    pub fs_type: String,
    pub fs_url: String,
    pub translation_mapping: String,
    pub pootle_mapping: String,
}

/// Sync commands for one project
pub struct FsPlugin<S: TranslationStore> {
    manifest_path: PathBuf,
    base_dir: PathBuf,
    config: ProjectConfig,
    mapping: PathMapping,
    backend: Box<dyn FsBackend>,
    stores: S,
}

impl<S: TranslationStore> FsPlugin<S> {
    /// Open the project described by the manifest at `manifest_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if the manifest has no backend,
    /// [`Error::UnknownBackend`] if its type is not registered and
    /// [`Error::InvalidMapping`] if the path templates are unusable.
    pub fn open(manifest_path: impl Into<PathBuf>, stores: S) -> Result<Self> {
        let manifest_path = manifest_path.into();
        let config = ProjectConfig::load(&manifest_path)?;
        let base_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let fs = config.fs_section(&manifest_path)?;
        let backend = open_backend(fs, &base_dir)?;
        let mapping = config.mapping(&manifest_path)?;

        tracing::debug!(
            project = %config.project.code,
            fs_type = backend.fs_type(),
            "Opened project"
        );

        Ok(Self {
            manifest_path,
            base_dir,
            config,
            mapping,
            backend,
            stores,
        })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn mapping(&self) -> &PathMapping {
        &self.mapping
    }

    pub fn backend(&self) -> &dyn FsBackend {
        self.backend.as_ref()
    }

    pub fn stores(&self) -> &S {
        &self.stores
    }

    pub fn stores_mut(&mut self) -> &mut S {
        &mut self.stores
    }

    pub fn state_dir(&self) -> PathBuf {
        self.config.state_dir(&self.base_dir)
    }

    pub fn tracking_path(&self) -> PathBuf {
        self.state_dir().join(TRACKING_FILE)
    }

    /// Current tracking rows, read without locking the project
    pub fn tracking(&self) -> Result<TrackingStore> {
        TrackingStore::open(&self.tracking_path())
    }

    pub fn info(&self) -> ProjectInfo {
        let (translation_mapping, pootle_mapping) = (
            self.mapping.translation_mapping().to_string(),
            self.mapping.pootle_mapping().to_string(),
        );
        ProjectInfo {
            code: self.config.project.code.clone(),
            fs_type: self.backend.fs_type().to_string(),
            fs_url: self.backend.fs_url().to_string(),
            translation_mapping,
            pootle_mapping,
        }
    }

    /// Classify every pairing matching `filter`.
    pub fn state(&self, filter: &PathFilter) -> Result<State> {
        let _lock = self.lock()?;
        self.backend.pull()?;
        let tracking = self.tracking()?;
        self.classify(&tracking, filter)
    }

    /// Stage untracked stores, and with `force` conflicting ones, for pushing.
    pub fn add(&mut self, force: bool, filter: &PathFilter) -> Result<Response> {
        self.plan(filter, |planner, state| planner.add(state, force))
    }

    /// Stage untracked files, and with `force` conflicting ones, for pulling.
    pub fn fetch(&mut self, force: bool, filter: &PathFilter) -> Result<Response> {
        self.plan(filter, |planner, state| planner.fetch(state, force))
    }

    /// Stage one-sided pairings for removal.
    pub fn rm(&mut self, filter: &PathFilter) -> Result<Response> {
        self.plan(filter, |planner, state| planner.rm(state))
    }

    /// Stage conflicts for resolution.
    pub fn merge(&mut self, pootle_wins: bool, filter: &PathFilter) -> Result<Response> {
        self.plan(filter, |planner, state| planner.merge(state, pootle_wins))
    }

    /// Carry out every staged and drifted pairing matching `filter`, then
    /// push the backend.
    ///
    /// # Errors
    ///
    /// Item failures are reported on the response. A failing backend push
    /// is returned as an error; completed items stay recorded and the next
    /// sync pushes them again.
    pub fn sync(&mut self, filter: &PathFilter) -> Result<Response> {
        let _lock = self.lock()?;
        self.backend.pull()?;
        let mut tracking = self.tracking()?;
        let state = self.classify(&tracking, filter)?;

        let response =
            SyncExecutor::new(self.backend.as_ref(), &mut self.stores, &mut tracking).execute(&state)?;
        self.backend.push()?;

        tracing::info!(
            items = response.len(),
            failed = response.has_failures(),
            "Sync complete"
        );
        Ok(response)
    }

    /// Point the project at another backend and save the manifest.
    ///
    /// Tracking rows are dropped if the type or location changed.
    pub fn set_fs(&mut self, fs_type: &str, url: &str) -> Result<()> {
        let _lock = self.lock()?;

        let mut config = self.config.clone();
        let changed = config.set_fs(fs_type, url);
        let fs = config.fs_section(&self.manifest_path)?;
        let backend = open_backend(fs, &self.base_dir)?;
        config.save(&self.manifest_path)?;

        if changed {
            let mut tracking = self.tracking()?;
            tracing::info!(
                fs_type,
                url,
                dropped = tracking.len(),
                "Backend changed; clearing tracking rows"
            );
            tracking.clear();
            tracking.persist()?;
        }

        self.config = config;
        self.backend = backend;
        Ok(())
    }

    fn plan<F>(&mut self, filter: &PathFilter, stage: F) -> Result<Response>
    where
        F: FnOnce(&mut ActionPlanner<'_>, &State) -> Result<Response>,
    {
        let _lock = self.lock()?;
        self.backend.pull()?;
        let mut tracking = self.tracking()?;
        let state = self.classify(&tracking, filter)?;
        stage(&mut ActionPlanner::new(&mut tracking), &state)
    }

    fn classify(&self, tracking: &TrackingStore, filter: &PathFilter) -> Result<State> {
        collect_state(
            tracking,
            &self.stores,
            self.backend.as_ref(),
            &self.mapping,
            filter,
        )
    }

    fn lock(&self) -> Result<ProjectLock> {
        ProjectLock::acquire(&self.state_dir()).map_err(|e| match e {
            Error::Io(source) => Error::Tracking {
                message: format!("Cannot create state directory: {}", source),
            },
            other => other,
        })
    }
}
