//! Error types for ferry-core.

use crate::sync::SyncStep;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ferry-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Git operation error.
    #[error("git error: {0}")]
    Git(#[from] ferry_git::Error),

    /// Hosting service error.
    #[error("GitHub error: {0}")]
    GitHub(#[from] ferry_github::Error),
}

/// Failure of one step of the sync protocol.
#[derive(Debug, thiserror::Error)]
#[error("{step} failed: {source}")]
pub struct SyncError {
    /// The step that failed.
    pub step: SyncStep,
    /// Underlying git failure.
    #[source]
    pub source: ferry_git::Error,
}

impl SyncError {
    /// Build a mapper tagging a git error with the step it occurred in.
    pub(crate) fn at(step: SyncStep) -> impl FnOnce(ferry_git::Error) -> Self {
        move |source| Self { step, source }
    }
}
