//! # ferry-core
//!
//! Core library for ferry. Provisions a private hosted repository and
//! remote for every working copy under a root folder, then transfers each
//! repository's default branch to the hosted remote through a temporary
//! transfer branch.
//!
//! Repositories are processed one at a time. A failure in one never stops
//! the next.

pub mod config;
pub mod discovery;
pub mod error;
pub mod provision;
pub mod report;
pub mod runner;
pub mod sync;

#[cfg(test)]
mod test_mocks;

pub use config::Config;
pub use discovery::{LocalRepo, discover, filter_by_name};
pub use error::{Error, Result, SyncError};
pub use provision::{Provisioned, Provisioner, RemoteOutcome, RepositoryOutcome};
pub use report::{Context, NullReporter, Reporter, Severity};
pub use runner::{RepoOutcome, RepoResult, RunSummary, Runner};
pub use sync::{SyncReport, SyncStep, TRANSFER_BRANCH, sync_repository};
