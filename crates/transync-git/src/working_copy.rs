//! Git working copy used as a translation file backend

use chrono::{DateTime, TimeZone, Utc};
use git2::{IndexAddOption, Repository, StatusOptions};
use transync_fs::NormalizedPath;

use crate::{Error, Result, helpers};

const DEFAULT_REMOTE: &str = "origin";

/// Information about a commit created by [`WorkingCopy::commit_all`].
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

/// A checked-out git repository whose files back translation stores.
///
/// The working tree is read and written directly; [`pull`](Self::pull) and
/// [`push`](Self::push) bracket a sync to exchange commits with upstream.
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    root: NormalizedPath,
    remote: String,
}

impl WorkingCopy {
    /// Open the working copy at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] if `root` has no `.git` entry.
    pub fn open(root: NormalizedPath) -> Result<Self> {
        if !root.join(".git").exists() {
            return Err(Error::NotARepository {
                path: root.to_native(),
            });
        }
        Ok(Self {
            root,
            remote: DEFAULT_REMOTE.to_string(),
        })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    fn repository(&self) -> Result<Repository> {
        Ok(Repository::open(self.root.to_native())?)
    }

    /// Branch checked out in the working copy.
    pub fn current_branch(&self) -> Result<String> {
        helpers::head_branch(&self.repository()?)
    }

    /// Short hash of the HEAD commit, `None` before the first commit.
    pub fn latest_hash(&self) -> Result<Option<String>> {
        let repo = self.repository()?;
        Ok(helpers::head_commit_id(&repo)?.map(|oid| format!("{:.7}", oid)))
    }

    /// Whether the working tree has uncommitted changes.
    pub fn has_changes(&self) -> Result<bool> {
        let repo = self.repository()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    /// Stage every change in the working tree, deletions included, and commit.
    ///
    /// Returns `None` when the resulting tree equals HEAD's tree.
    pub fn commit_all(&self, message: &str) -> Result<Option<CommitInfo>> {
        let repo = self.repository()?;
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        let tree_id = index.write_tree()?;

        let parent = match helpers::head_commit_id(&repo)? {
            Some(oid) => Some(repo.find_commit(oid)?),
            None => None,
        };
        if let Some(parent) = &parent
            && parent.tree_id() == tree_id
        {
            return Ok(None);
        }

        let tree = repo.find_tree(tree_id)?;
        let sig = helpers::signature(&repo)?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        let commit = repo.find_commit(oid)?;
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();

        tracing::debug!(commit = %oid, "Committed working copy changes");

        Ok(Some(CommitInfo {
            hash: format!("{:.7}", oid),
            message: message.lines().next().unwrap_or("").to_string(),
            timestamp,
        }))
    }

    /// Fetch from the remote and fast-forward the current branch.
    ///
    /// Returns `true` if the working tree changed.
    pub fn pull(&self) -> Result<bool> {
        let repo = self.repository()?;
        let branch = helpers::head_branch(&repo)?;
        helpers::pull(&repo, &self.remote, &branch)
    }

    /// Push the current branch to the remote.
    pub fn push(&self) -> Result<()> {
        let repo = self.repository()?;
        let branch = helpers::head_branch(&repo)?;
        helpers::push(&repo, &self.remote, &branch)
    }
}
