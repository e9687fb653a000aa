//! Sync behaviour when individual backend primitives fail

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use transync_core::mapping::DEFAULT_POOTLE_MAPPING;
use transync_core::{
    ActionPlanner, ActionType, Error, FsBackend, FsStateKind, LocalFsBackend, MemoryStore, PathFilter,
    PathMapping, Response, Result, Stage, State, SyncExecutor, TrackingStore, TranslationStore,
    collect_state,
};
use transync_fs::NormalizedPath;
use transync_test_utils::project::{DEFAULT_MAPPING, TestProject};

/// Local backend with injectable per-path failures
struct FaultyBackend {
    inner: LocalFsBackend,
    fail_read: Mutex<HashSet<String>>,
    fail_write: Mutex<HashSet<String>>,
    fail_fingerprint: Mutex<HashSet<String>>,
    /// Overwrite a file once, right after it has been read
    rewrite_after_read: Mutex<Option<(String, String)>>,
}

impl FaultyBackend {
    fn new(project: &TestProject) -> Self {
        Self {
            inner: LocalFsBackend::new(NormalizedPath::new(project.translations_dir()), "translations"),
            fail_read: Mutex::default(),
            fail_write: Mutex::default(),
            fail_fingerprint: Mutex::default(),
            rewrite_after_read: Mutex::default(),
        }
    }

    fn check(set: &Mutex<HashSet<String>>, path: &str, op: &str) -> Result<()> {
        if set.lock().unwrap().contains(path) {
            return Err(Error::Backend {
                path: path.to_string(),
                message: format!("injected {} failure", op),
            });
        }
        Ok(())
    }

    fn heal(&self) {
        self.fail_read.lock().unwrap().clear();
        self.fail_write.lock().unwrap().clear();
        self.fail_fingerprint.lock().unwrap().clear();
    }
}

impl FsBackend for FaultyBackend {
    fn fs_type(&self) -> &'static str {
        self.inner.fs_type()
    }

    fn fs_url(&self) -> &str {
        self.inner.fs_url()
    }

    fn list_paths(&self) -> Result<BTreeSet<String>> {
        self.inner.list_paths()
    }

    fn exists(&self, path: &str) -> Result<bool> {
        self.inner.exists(path)
    }

    fn fingerprint(&self, path: &str) -> Result<String> {
        Self::check(&self.fail_fingerprint, path, "fingerprint")?;
        self.inner.fingerprint(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Self::check(&self.fail_read, path, "read")?;
        let content = self.inner.read(path)?;
        let rewrite = self.rewrite_after_read.lock().unwrap().take();
        if let Some((target, replacement)) = rewrite {
            if target == path {
                self.inner.write(path, replacement.as_bytes())?;
            } else {
                *self.rewrite_after_read.lock().unwrap() = Some((target, replacement));
            }
        }
        Ok(content)
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        Self::check(&self.fail_write, path, "write")?;
        self.inner.write(path, content)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path)
    }

    fn pull(&self) -> Result<()> {
        Ok(())
    }

    fn push(&self) -> Result<()> {
        Ok(())
    }
}

/// Project driven through the planner and executor with a faulty backend
struct Harness {
    project: TestProject,
    backend: FaultyBackend,
    stores: MemoryStore,
    mapping: PathMapping,
}

impl Harness {
    fn new() -> Self {
        let project = TestProject::local("proj");
        let backend = FaultyBackend::new(&project);
        Self {
            project,
            backend,
            stores: MemoryStore::new(),
            mapping: PathMapping::new("proj", DEFAULT_MAPPING, DEFAULT_POOTLE_MAPPING).unwrap(),
        }
    }

    fn tracking(&self) -> TrackingStore {
        TrackingStore::open(&self.project.root().join(".transync/tracking.toml")).unwrap()
    }

    fn row(&self, pootle_path: &str) -> transync_core::StoreFs {
        self.tracking().get(pootle_path).cloned().unwrap()
    }

    fn state(&self) -> State {
        self.try_state().unwrap()
    }

    fn try_state(&self) -> Result<State> {
        collect_state(
            &self.tracking(),
            &self.stores,
            &self.backend,
            &self.mapping,
            &PathFilter::all(),
        )
    }

    fn add(&mut self) -> Response {
        let state = self.state();
        let mut tracking = self.tracking();
        ActionPlanner::new(&mut tracking).add(&state, false).unwrap()
    }

    fn fetch(&mut self) -> Response {
        let state = self.state();
        let mut tracking = self.tracking();
        ActionPlanner::new(&mut tracking).fetch(&state, false).unwrap()
    }

    fn sync(&mut self) -> Response {
        let state = self.state();
        let mut tracking = self.tracking();
        SyncExecutor::new(&self.backend, &mut self.stores, &mut tracking)
            .execute(&state)
            .unwrap()
    }

    /// Add and sync every listed store.
    fn synced(stores: &[(&str, &str)]) -> Self {
        let mut harness = Self::new();
        for (path, content) in stores {
            harness.stores.insert(path, *content);
        }
        harness.add();
        let response = harness.sync();
        assert_eq!(response.completed(ActionType::PushedToFs).len(), stores.len());
        assert!(!harness.state().has_changed());
        harness
    }
}

fn paths(state: &State, kind: FsStateKind) -> Vec<&str> {
    state[kind].iter().map(|s| s.pootle_path.as_str()).collect()
}

fn item_paths(items: Vec<&transync_core::ResponseItem>) -> Vec<&str> {
    items.into_iter().map(|item| item.pootle_path()).collect()
}

#[test]
fn watermark_hashes_the_bytes_that_were_pulled() {
    let mut harness = Harness::new();
    harness.project.write_file("/en/foo.po", "v1");
    harness.fetch();

    *harness.backend.rewrite_after_read.lock().unwrap() =
        Some(("/en/foo.po".to_string(), "v2-external".to_string()));
    let response = harness.sync();
    assert_eq!(item_paths(response.completed(ActionType::PulledToPootle)), vec!["/en/proj/foo.po"]);
    assert_eq!(harness.stores.content_str("/en/proj/foo.po").as_deref(), Some("v1"));

    // The external edit made after the read is still pending
    let state = harness.state();
    assert_eq!(paths(&state, FsStateKind::FsAhead), vec!["/en/proj/foo.po"]);

    harness.sync();
    assert_eq!(harness.stores.content_str("/en/proj/foo.po").as_deref(), Some("v2-external"));
    assert!(!harness.state().has_changed());
}

#[test]
fn watermark_hashes_the_bytes_that_were_pushed() {
    let mut harness = Harness::synced(&[("/en/proj/foo.po", "v1")]);
    harness.stores.insert("/en/proj/foo.po", "v2");

    let response = harness.sync();
    assert_eq!(item_paths(response.completed(ActionType::PushedToFs)), vec!["/en/proj/foo.po"]);
    let row = harness.row("/en/proj/foo.po");
    assert_eq!(row.last_sync_hash(), Some(transync_fs::compute_checksum(b"v2").as_str()));
    harness.project.assert_file_content("/en/foo.po", "v2");
}

#[test]
fn unreadable_fingerprint_skips_only_that_pairing() {
    let mut harness = Harness::synced(&[("/en/proj/foo.po", "foo"), ("/en/proj/bar.po", "bar")]);
    harness.project.write_file("/en/foo.po", "foo edited");
    harness
        .backend
        .fail_fingerprint
        .lock()
        .unwrap()
        .insert("/en/bar.po".to_string());

    let state = harness.try_state().unwrap();
    assert_eq!(paths(&state, FsStateKind::FsAhead), vec!["/en/proj/foo.po"]);
    assert!(state.find("/en/proj/bar.po").is_none());
    assert!(state[FsStateKind::FsUntracked].is_empty());
    assert!(state[FsStateKind::PootleUntracked].is_empty());

    let response = harness.sync();
    assert_eq!(item_paths(response.completed(ActionType::PulledToPootle)), vec!["/en/proj/foo.po"]);
    assert_eq!(harness.stores.content_str("/en/proj/foo.po").as_deref(), Some("foo edited"));

    harness.backend.heal();
    assert!(!harness.state().has_changed());
}

#[test]
fn failed_write_leaves_item_staged_and_commits_the_rest() {
    let mut harness = Harness::new();
    for path in ["/en/proj/a.po", "/en/proj/b.po", "/en/proj/c.po"] {
        harness.stores.insert(path, path);
    }
    harness.add();
    harness.backend.fail_write.lock().unwrap().insert("/en/b.po".to_string());

    let response = harness.sync();
    assert!(response.has_failures());
    assert_eq!(
        item_paths(response.completed(ActionType::PushedToFs)),
        vec!["/en/proj/a.po", "/en/proj/c.po"]
    );
    assert_eq!(item_paths(response.failed(ActionType::PushedToFs)), vec!["/en/proj/b.po"]);

    for path in ["/en/proj/a.po", "/en/proj/c.po"] {
        let row = harness.row(path);
        assert_eq!(row.stage, Stage::Tracked);
        assert!(row.watermark.is_some());
    }
    let failed = harness.row("/en/proj/b.po");
    assert_eq!(failed.stage, Stage::Add);
    assert_eq!(failed.watermark, None);
    harness.project.assert_file_missing("/en/b.po");

    let state = harness.state();
    assert_eq!(paths(&state, FsStateKind::PootleStaged), vec!["/en/proj/b.po"]);

    harness.backend.heal();
    let response = harness.sync();
    assert_eq!(item_paths(response.completed(ActionType::PushedToFs)), vec!["/en/proj/b.po"]);
    harness.project.assert_file_content("/en/b.po", "/en/proj/b.po");
}

#[test]
fn failed_read_keeps_watermark_of_drifted_item() {
    let mut harness = Harness::synced(&[("/en/proj/a.po", "a"), ("/en/proj/b.po", "b")]);
    harness.project.write_file("/en/a.po", "a edited");
    harness.project.write_file("/en/b.po", "b edited");
    let before = harness.row("/en/proj/b.po");
    harness.backend.fail_read.lock().unwrap().insert("/en/b.po".to_string());

    let response = harness.sync();
    assert_eq!(item_paths(response.completed(ActionType::PulledToPootle)), vec!["/en/proj/a.po"]);
    assert_eq!(item_paths(response.failed(ActionType::PulledToPootle)), vec!["/en/proj/b.po"]);
    assert_eq!(harness.stores.content_str("/en/proj/a.po").as_deref(), Some("a edited"));
    assert_eq!(harness.stores.content_str("/en/proj/b.po").as_deref(), Some("b"));
    assert_eq!(harness.row("/en/proj/b.po"), before);

    let state = harness.state();
    assert_eq!(paths(&state, FsStateKind::FsAhead), vec!["/en/proj/b.po"]);
}
