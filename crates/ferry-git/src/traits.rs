//! Trait abstractions for git operations.
//!
//! This module defines the `GitOps` trait which abstracts the working-copy
//! operations ferry needs, enabling dependency injection and testability.

use std::path::Path;

use crate::{Remote, Result};

/// Trait for git repository operations.
///
/// This trait abstracts git operations, allowing for:
/// - Dependency injection in the provisioner and sync engine
/// - Mock implementations for testing
///
/// Note: Unlike `HostingApi`, git operations are synchronous since
/// git2 and the git binary are driven synchronously.
#[allow(clippy::missing_errors_doc)]
pub trait GitOps {
    // === Repository Info ===

    /// Get the working directory path.
    fn workdir(&self) -> Option<&Path>;

    /// Get the current branch name.
    ///
    /// Returns an error if HEAD is detached or unborn.
    fn current_branch(&self) -> Result<String>;

    // === Branch Operations ===

    /// Check if a local branch exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// List all local branches.
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Create a new local branch pointing at `start_point` (any revspec,
    /// e.g. `origin/main`). Does not check it out.
    fn create_branch_from(&self, name: &str, start_point: &str) -> Result<()>;

    /// Checkout a local branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Delete a local branch.
    ///
    /// Without `force`, refuses to delete a branch not merged into HEAD.
    fn delete_branch(&self, name: &str, force: bool) -> Result<()>;

    // === Remote Operations ===

    /// List registered remotes.
    fn remotes(&self) -> Result<Vec<Remote>>;

    /// List registered remote names.
    fn remote_names(&self) -> Result<Vec<String>> {
        Ok(self.remotes()?.into_iter().map(|r| r.name).collect())
    }

    /// Branch the remote's recorded HEAD points at.
    fn remote_head(&self, remote: &str) -> Option<String>;

    /// Register a new remote.
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Fetch all refs from a remote.
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Pull `src_branch` from `remote` into the local `dst_branch`,
    /// fast-forward only.
    fn pull(&self, remote: &str, src_branch: &str, dst_branch: &str) -> Result<()>;

    /// Push a local branch to a remote under the same name.
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}
