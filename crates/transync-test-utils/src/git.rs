//! Git fixtures: a bare remote with history, and clones of it.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

const BRANCH: &str = "main";

fn init_options(bare: bool) -> RepositoryInitOptions {
    let mut opts = RepositoryInitOptions::new();
    opts.bare(bare).initial_head(BRANCH);
    opts
}

/// Create a bare repository at `path` whose `main` branch holds one commit
/// adding `README.md`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn bare_remote(path: &Path) -> PathBuf {
    Repository::init_opts(path, &init_options(true))
        .unwrap_or_else(|e| panic!("bare_remote: failed to init {}: {e}", path.display()));

    let seed_dir = TempDir::new().unwrap_or_else(|e| panic!("bare_remote: temp dir: {e}"));
    let seed = Repository::init_opts(seed_dir.path(), &init_options(false))
        .unwrap_or_else(|e| panic!("bare_remote: failed to init seed: {e}"));

    fs::write(seed_dir.path().join("README.md"), "# Translations\n")
        .unwrap_or_else(|e| panic!("bare_remote: failed to write README.md: {e}"));

    let mut index = seed.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = seed.find_tree(tree_id).unwrap();
    let sig = Signature::now("Test User", "test@test.com").unwrap();
    seed.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .unwrap_or_else(|e| panic!("bare_remote: failed to commit: {e}"));

    let url = path.to_string_lossy();
    let mut remote = seed
        .remote("origin", &url)
        .unwrap_or_else(|e| panic!("bare_remote: failed to add remote: {e}"));
    let refspec = format!("refs/heads/{BRANCH}:refs/heads/{BRANCH}");
    remote
        .push(&[refspec.as_str()], None)
        .unwrap_or_else(|e| panic!("bare_remote: failed to push seed commit: {e}"));

    path.to_path_buf()
}

/// Clone `remote` into `dest`, checking out `main`.
///
/// # Panics
/// Panics if the clone fails.
pub fn clone_remote(remote: &Path, dest: &Path) -> PathBuf {
    Repository::clone(&remote.to_string_lossy(), dest).unwrap_or_else(|e| {
        panic!(
            "clone_remote: failed to clone {} into {}: {e}",
            remote.display(),
            dest.display()
        )
    });
    dest.to_path_buf()
}

/// Commit every change in the working tree at `path` as a third party would.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(path: &Path, message: &str) {
    let repo = Repository::open(path).unwrap();
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    let sig = Signature::now("Test User", "test@test.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
        .unwrap();
}

/// Push `main` of the clone at `path` to its `origin`.
///
/// # Panics
/// Panics if the push fails.
pub fn push_main(path: &Path) {
    let repo = Repository::open(path).unwrap();
    let mut remote = repo.find_remote("origin").unwrap();
    let refspec = format!("refs/heads/{BRANCH}:refs/heads/{BRANCH}");
    remote.push(&[refspec.as_str()], None).unwrap();
}
