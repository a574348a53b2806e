//! # ferry-git
//!
//! Git operations abstraction layer for ferry, built on git2-rs.
//! Provides the branch and remote operations the sync engine drives,
//! with network transfers delegated to the system `git` binary so
//! configured credential helpers apply.

mod error;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use repository::{Remote, Repository};
pub use traits::GitOps;
