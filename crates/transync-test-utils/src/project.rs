//! [`TestProject`]: a temporary translation project on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const DEFAULT_MAPPING: &str = "/<language_code>/<dir_path><filename>.<ext>";

/// A temporary directory holding a project manifest and a translations
/// directory, with helpers for arranging and asserting backend files.
///
/// # Example
///
/// ```rust,no_run
/// use transync_test_utils::project::TestProject;
///
/// let project = TestProject::local("proj");
/// project.write_file("/en/foo.po", "msgid \"\"\n");
/// project.assert_file_content("/en/foo.po", "msgid \"\"\n");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    translations: PathBuf,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// An empty project directory with an empty `translations/` directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let translations = temp_dir.path().join("translations");
        fs::create_dir_all(&translations).unwrap();
        Self {
            temp_dir,
            translations,
        }
    }

    /// A project backed by the local `translations/` directory.
    pub fn local(code: &str) -> Self {
        let project = Self::new();
        project.write_manifest(code, "localfs", "translations", DEFAULT_MAPPING);
        project
    }

    /// A project backed by a git clone at `working_copy`.
    pub fn git(code: &str, working_copy: &Path) -> Self {
        let mut project = Self::new();
        project.translations = working_copy.to_path_buf();
        project.write_manifest(code, "git", &working_copy.to_string_lossy(), DEFAULT_MAPPING);
        project
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn translations_dir(&self) -> &Path {
        &self.translations
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("transync.toml")
    }

    /// Write `transync.toml` with a `[project]` and an `[fs]` section.
    pub fn write_manifest(&self, code: &str, fs_type: &str, url: &str, mapping: &str) {
        let content = format!(
            "[project]\ncode = \"{code}\"\n\n[fs]\ntype = \"{fs_type}\"\nurl = \"{url}\"\ntranslation_mapping = \"{mapping}\"\n"
        );
        self.write_manifest_raw(&content);
    }

    pub fn write_manifest_raw(&self, content: &str) {
        fs::write(self.manifest_path(), content).unwrap();
    }

    fn file_path(&self, fs_path: &str) -> PathBuf {
        self.translations.join(fs_path.trim_start_matches('/'))
    }

    /// Write a backend file, creating parent directories.
    pub fn write_file(&self, fs_path: &str, content: &str) {
        let path = self.file_path(fs_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read_file(&self, fs_path: &str) -> String {
        fs::read_to_string(self.file_path(fs_path))
            .unwrap_or_else(|e| panic!("read_file: {fs_path}: {e}"))
    }

    pub fn remove_file(&self, fs_path: &str) {
        fs::remove_file(self.file_path(fs_path)).unwrap();
    }

    pub fn file_exists(&self, fs_path: &str) -> bool {
        self.file_path(fs_path).is_file()
    }

    pub fn assert_file_content(&self, fs_path: &str, expected: &str) {
        assert_eq!(
            self.read_file(fs_path),
            expected,
            "content mismatch for {fs_path}"
        );
    }

    pub fn assert_file_missing(&self, fs_path: &str) {
        assert!(!self.file_exists(fs_path), "expected {fs_path} to be absent");
    }
}
