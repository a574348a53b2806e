//! Repository wrapper providing high-level git operations.

use std::path::Path;
use std::process::{Command, Stdio};

use git2::{BranchType, ErrorCode, build::CheckoutBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::GitOps;

/// A named remote registered on a working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (e.g. `origin`).
    pub name: String,
    /// Fetch URL.
    pub url: String,
}

/// High-level wrapper around a git working copy.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open the working copy rooted at exactly `path`.
    ///
    /// Parent directories are not searched.
    ///
    /// # Errors
    /// Returns error if `path` is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = git2::Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::NotARepository(path.display().to_string()),
            _ => Error::Git2(e),
        })?;
        Ok(Self { inner })
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    // === Branch operations ===

    /// Get the name of the current branch.
    ///
    /// # Errors
    /// Returns error if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => Error::DetachedHead,
            _ => Error::Git2(e),
        })?;
        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(Error::DetachedHead)
    }

    /// Check if a local branch exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }

    /// List all local branches.
    ///
    /// # Errors
    /// Returns error if branch listing fails.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let branches = self.inner.branches(Some(BranchType::Local))?;

        let names: Vec<String> = branches
            .filter_map(|b| b.ok())
            .filter_map(|(b, _)| b.name().ok().flatten().map(String::from))
            .collect();

        Ok(names)
    }

    /// Create a local branch at the commit `start_point` resolves to.
    ///
    /// # Errors
    /// Returns error if the branch exists or `start_point` cannot be resolved.
    pub fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()> {
        if self.branch_exists(name) {
            return Err(Error::BranchExists(name.into()));
        }

        let commit = self
            .inner
            .revparse_single(start_point)
            .map_err(|_| Error::RefNotFound(start_point.into()))?
            .peel_to_commit()?;
        self.inner.branch(name, &commit, false)?;

        debug!(branch = name, start_point, commit = %commit.id(), "created branch");
        Ok(())
    }

    /// Checkout a local branch.
    ///
    /// Uses a safe checkout: local modifications that would be overwritten
    /// make the checkout fail instead of being discarded.
    ///
    /// # Errors
    /// Returns error if the branch is missing or checkout fails.
    pub fn checkout(&self, branch_name: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch_name.into()))?;

        let object = branch.get().peel(git2::ObjectType::Commit)?;

        self.inner
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;
        self.inner.set_head(&format!("refs/heads/{branch_name}"))?;

        debug!(branch = branch_name, "checked out");
        Ok(())
    }

    /// Delete a local branch.
    ///
    /// # Errors
    /// Returns error if the branch is missing, is checked out, or is not
    /// merged into HEAD and `force` is false.
    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        if self.current_branch().ok().as_deref() == Some(name) {
            return Err(Error::BranchCheckedOut(name.into()));
        }

        let mut branch = self
            .inner
            .find_branch(name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(name.into()))?;

        if !force {
            let tip = branch
                .get()
                .target()
                .ok_or_else(|| Error::BranchNotFound(name.into()))?;
            let head = self.inner.head()?.peel_to_commit()?.id();
            if tip != head && !self.inner.graph_descendant_of(head, tip)? {
                return Err(Error::BranchNotMerged(name.into()));
            }
        }

        branch.delete()?;
        debug!(branch = name, force, "deleted branch");
        Ok(())
    }

    // === Remote operations ===

    /// List registered remotes.
    ///
    /// # Errors
    /// Returns error if the remote configuration cannot be read.
    pub fn remotes(&self) -> Result<Vec<Remote>> {
        let names = self.inner.remotes()?;
        let mut remotes = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let remote = self.inner.find_remote(name)?;
            remotes.push(Remote {
                name: name.to_string(),
                url: remote.url().unwrap_or_default().to_string(),
            });
        }

        Ok(remotes)
    }

    /// Branch named by `refs/remotes/<remote>/HEAD`, if the remote-tracking
    /// HEAD is recorded (clones record it).
    #[must_use]
    pub fn remote_head(&self, remote: &str) -> Option<String> {
        let prefix = format!("refs/remotes/{remote}/");
        let reference = self.inner.find_reference(&format!("{prefix}HEAD")).ok()?;
        reference
            .symbolic_target()?
            .strip_prefix(&prefix)
            .map(str::to_string)
    }

    /// Register a new remote.
    ///
    /// # Errors
    /// Returns `RemoteExists` if the name is taken.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        if self.inner.find_remote(name).is_ok() {
            return Err(Error::RemoteExists(name.into()));
        }
        self.inner.remote(name, url)?;
        debug!(remote = name, url, "added remote");
        Ok(())
    }

    /// Fetch all refs from a remote.
    ///
    /// # Errors
    /// Returns error if the remote is missing or the fetch fails.
    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.require_remote(remote)?;
        self.run_git(&["fetch", "--prune", remote])
            .map_err(Error::FetchFailed)
    }

    /// Pull `src_branch` from `remote` into local `dst_branch` (fast-forward only).
    ///
    /// # Errors
    /// Returns error if the remote is missing or histories diverged.
    pub fn pull(&self, remote: &str, src_branch: &str, dst_branch: &str) -> Result<()> {
        self.require_remote(remote)?;
        let refspec = format!("{src_branch}:{dst_branch}");
        self.run_git(&["pull", "--ff-only", "--no-rebase", remote, &refspec])
            .map_err(Error::PullFailed)
    }

    /// Push a local branch to a remote under the same name.
    ///
    /// # Errors
    /// Returns error if the remote is missing or the push is rejected.
    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.require_remote(remote)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.run_git(&["push", remote, &refspec])
            .map_err(Error::PushFailed)
    }

    fn require_remote(&self, name: &str) -> Result<()> {
        self.inner
            .find_remote(name)
            .map(|_| ())
            .map_err(|_| Error::RemoteNotFound(name.into()))
    }

    /// Run the git binary inside this working copy.
    ///
    /// Returns trimmed stderr on a non-zero exit.
    fn run_git(&self, args: &[&str]) -> std::result::Result<(), String> {
        let dir = self.workdir().unwrap_or_else(|| self.git_dir());
        debug!(?args, dir = %dir.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to run git: {e}"))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(if stderr.is_empty() {
                format!("git {} exited with {}", args.join(" "), output.status)
            } else {
                stderr
            })
        }
    }

    // === Low-level access ===

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer high-level methods.
    #[must_use]
    pub fn inner(&self) -> &git2::Repository {
        &self.inner
    }
}

impl GitOps for Repository {
    fn workdir(&self) -> Option<&Path> {
        self.workdir()
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch()
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.branch_exists(name)
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        self.list_branches()
    }

    fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()> {
        self.create_branch_from(name, start_point)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.checkout(branch)
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.delete_branch(name, force)
    }

    fn remotes(&self) -> Result<Vec<Remote>> {
        self.remotes()
    }

    fn remote_head(&self, remote: &str) -> Option<String> {
        self.remote_head(remote)
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.add_remote(name, url)
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.fetch(remote)
    }

    fn pull(&self, remote: &str, src_branch: &str, dst_branch: &str) -> Result<()> {
        self.pull(remote, src_branch, dst_branch)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.push(remote, branch)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}
