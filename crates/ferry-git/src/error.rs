//! Error types for ferry-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path is not a git working copy.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Revision or reference could not be resolved.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// HEAD is detached or unborn (not on a branch).
    #[error("HEAD is not on a branch")]
    DetachedHead,

    /// Branch already exists.
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Branch is checked out and cannot be deleted.
    #[error("cannot delete checked-out branch: {0}")]
    BranchCheckedOut(String),

    /// Branch is not fully merged and a non-forced delete was requested.
    #[error("branch '{0}' is not fully merged")]
    BranchNotMerged(String),

    /// Remote not found.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Remote with this name is already registered.
    #[error("remote already exists: {0}")]
    RemoteExists(String),

    /// Fetch failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Pull failed (including non-fast-forward histories).
    #[error("pull failed: {0}")]
    PullFailed(String),

    /// Push failed.
    #[error("push failed: {0}")]
    PushFailed(String),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}
