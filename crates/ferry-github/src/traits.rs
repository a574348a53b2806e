//! Trait abstractions for GitHub API operations.
//!
//! This module defines the `HostingApi` trait which abstracts the hosting
//! service operations the provisioner needs, enabling dependency injection
//! and testability.

use crate::{CreateRepository, HostedRepository, Result, User};

/// Trait for hosting-service operations.
///
/// This trait abstracts GitHub API calls, allowing for:
/// - Dependency injection in the provisioner
/// - Mock implementations for testing
pub trait HostingApi: Send + Sync {
    /// Get the authenticated account.
    fn current_user(&self) -> impl std::future::Future<Output = Result<User>> + Send;

    /// Look up a repository by owner and name.
    ///
    /// Returns `None` if no such repository is visible to the token.
    fn find_repo(
        &self,
        owner: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<HostedRepository>>> + Send;

    /// Create a repository owned by the authenticated account.
    fn create_repo(
        &self,
        repo: CreateRepository,
    ) -> impl std::future::Future<Output = Result<HostedRepository>> + Send;
}
