//! Shared git2 helper functions for working-copy operations

use git2::{ErrorCode, Oid, Repository, Signature};

use crate::{Error, Result};

const FALLBACK_NAME: &str = "transync";
const FALLBACK_EMAIL: &str = "transync@localhost";

/// Name of the branch HEAD points at, including an unborn branch.
pub fn head_branch(repo: &Repository) -> Result<String> {
    let head = repo.find_reference("HEAD")?;
    match head.symbolic_target() {
        Some(target) => Ok(target.trim_start_matches("refs/heads/").to_string()),
        None => Err(Error::DetachedHead),
    }
}

/// Commit id HEAD resolves to, or `None` for an unborn branch.
pub fn head_commit_id(repo: &Repository) -> Result<Option<Oid>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Signature from git config, falling back to a fixed identity.
pub fn signature(repo: &Repository) -> Result<Signature<'static>> {
    match repo.signature() {
        Ok(sig) => Ok(sig.to_owned()),
        Err(_) => Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
    }
}

/// Push `branch` to `remote_name`.
pub fn push(repo: &Repository, remote_name: &str, branch: &str) -> Result<()> {
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);

    // Default options rely on credential helpers
    remote
        .push(&[&refspec], None)
        .map_err(|e| Error::PushFailed {
            message: e.message().to_string(),
        })?;

    Ok(())
}

/// Fetch `remote_name` and fast-forward `branch` to its upstream tip.
///
/// Returns `true` if the working copy changed. A branch that does not
/// exist upstream yet leaves the working copy untouched.
pub fn pull(repo: &Repository, remote_name: &str, branch: &str) -> Result<bool> {
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|_| Error::RemoteNotFound {
            name: remote_name.to_string(),
        })?;

    let no_refspecs: &[&str] = &[];
    remote
        .fetch(no_refspecs, None, None)
        .map_err(|e| Error::PullFailed {
            message: format!("Fetch failed: {}", e.message()),
        })?;

    let tracking_ref = format!("refs/remotes/{}/{}", remote_name, branch);
    let upstream = match repo.find_reference(&tracking_ref) {
        Ok(reference) => reference.peel_to_commit()?,
        Err(e) if e.code() == ErrorCode::NotFound => {
            tracing::debug!(branch = %branch, "Branch not present upstream; nothing to pull");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let refname = format!("refs/heads/{}", branch);
    let checkout = || {
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))
    };

    let Some(head_id) = head_commit_id(repo)? else {
        repo.reference(&refname, upstream.id(), true, "pull: initial checkout")?;
        repo.set_head(&refname)?;
        checkout()?;
        return Ok(true);
    };

    let annotated = repo.find_annotated_commit(upstream.id())?;
    let (analysis, _) = repo.merge_analysis(&[&annotated])?;

    if analysis.is_up_to_date() {
        return Ok(false);
    }

    if analysis.is_fast_forward() {
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(
            upstream.id(),
            &format!("pull: fast-forward to {}", upstream.id()),
        )?;
        checkout()?;
        return Ok(true);
    }

    Err(Error::CannotFastForward {
        message: format!(
            "Cannot fast-forward {} from {} to {}. Manual merge required.",
            branch,
            head_id,
            upstream.id()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn head_branch_of_unborn_repository() {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(temp_dir.path(), &opts).unwrap();

        assert_eq!(head_branch(&repo).unwrap(), "main");
        assert_eq!(head_commit_id(&repo).unwrap(), None);
    }

    #[test]
    fn signature_is_always_available() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        let sig = signature(&repo).unwrap();
        assert!(sig.name().is_some());
    }
}
