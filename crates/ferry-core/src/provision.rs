//! Remote provisioning: one private hosted repository and one remote per
//! working copy, safe to re-run.

use ferry_git::GitOps;
use ferry_github::{CreateRepository, HostedRepository, HostingApi};
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::report::Context;

/// Whether the hosted repository already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOutcome {
    /// Lookup found an existing repository.
    Found,
    /// A new private repository was created.
    Created,
}

/// Whether the hosted remote had to be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The remote was registered.
    Added,
    /// A remote with the hosted name already existed and was left untouched.
    AlreadyPresent,
}

/// Result of provisioning one working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// The hosted repository.
    pub hosted: HostedRepository,
    /// Lookup outcome.
    pub repository: RepositoryOutcome,
    /// Remote registration outcome.
    pub remote: RemoteOutcome,
}

/// Ensures hosted repositories and their remotes exist.
pub struct Provisioner<'a, H: HostingApi> {
    client: &'a H,
    /// Login of the authenticated account, resolved on first use.
    owner: OnceCell<String>,
}

#[allow(clippy::future_not_send)]
impl<'a, H: HostingApi> Provisioner<'a, H> {
    /// Create a provisioner.
    #[must_use]
    pub fn new(client: &'a H) -> Self {
        Self {
            client,
            owner: OnceCell::new(),
        }
    }

    /// Ensure `name` has a private hosted repository and `repo` has the
    /// hosted remote registered.
    ///
    /// An existing remote with the hosted name is never modified, even if
    /// its URL differs from the hosted clone URL.
    ///
    /// # Errors
    /// Returns error if the lookup, creation or remote registration fails.
    /// The failure is also reported through `ctx`.
    pub async fn provision<G: GitOps>(
        &self,
        ctx: &Context<'_>,
        repo: &G,
        name: &str,
    ) -> Result<Provisioned> {
        match self.try_provision(ctx, repo, name).await {
            Ok(provisioned) => Ok(provisioned),
            Err(e) => {
                ctx.error(name, &format!("Error processing GitHub repository: {e}"));
                Err(e)
            }
        }
    }

    async fn try_provision<G: GitOps>(
        &self,
        ctx: &Context<'_>,
        repo: &G,
        name: &str,
    ) -> Result<Provisioned> {
        let (hosted, repository) = self.find_or_create(ctx, name).await?;

        let hosted_remote = ctx.hosted_remote();
        let remote = if repo.remote_names()?.iter().any(|r| r == hosted_remote) {
            ctx.info(name, &format!("Remote '{hosted_remote}' already exists"));
            RemoteOutcome::AlreadyPresent
        } else {
            repo.add_remote(hosted_remote, &hosted.clone_url)?;
            ctx.success(
                name,
                &format!("Added remote '{hosted_remote}' -> {}", hosted.clone_url),
            );
            RemoteOutcome::Added
        };

        Ok(Provisioned {
            hosted,
            repository,
            remote,
        })
    }

    async fn find_or_create(
        &self,
        ctx: &Context<'_>,
        name: &str,
    ) -> Result<(HostedRepository, RepositoryOutcome)> {
        let owner = self.owner().await?;

        if let Some(hosted) = self.client.find_repo(owner, name).await? {
            ctx.info(
                name,
                &format!("Found existing GitHub repository {}", hosted.full_name),
            );
            return Ok((hosted, RepositoryOutcome::Found));
        }

        ctx.info(name, "Creating new private GitHub repository");
        match self.client.create_repo(CreateRepository::private(name)).await {
            Ok(hosted) => {
                ctx.success(name, &format!("Created {}", hosted.full_name));
                Ok((hosted, RepositoryOutcome::Created))
            }
            // Created by someone else since the lookup.
            Err(ferry_github::Error::AlreadyExists(taken)) => {
                match self.client.find_repo(owner, name).await? {
                    Some(hosted) => Ok((hosted, RepositoryOutcome::Found)),
                    None => Err(ferry_github::Error::AlreadyExists(taken).into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn owner(&self) -> Result<&str> {
        let login = self
            .owner
            .get_or_try_init(|| async {
                let user = self.client.current_user().await?;
                tracing::debug!(login = %user.login, "authenticated");
                Ok::<_, ferry_github::Error>(user.login)
            })
            .await?;
        Ok(login.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::report::{NullReporter, Severity};
    use crate::test_mocks::{MockGitOps, MockHosting, RecordingReporter};

    #[tokio::test]
    async fn test_creates_repo_and_remote() {
        let config = Config::default();
        let ctx = Context::new(&config, &NullReporter);
        let hosting = MockHosting::new("octo");
        let repo = MockGitOps::new().with_remote("origin", "/src.git");

        let provisioned = Provisioner::new(&hosting)
            .provision(&ctx, &repo, "notes")
            .await
            .unwrap();

        assert_eq!(provisioned.repository, RepositoryOutcome::Created);
        assert_eq!(provisioned.remote, RemoteOutcome::Added);
        assert!(provisioned.hosted.private);
        assert_eq!(
            repo.remote_url("github").as_deref(),
            Some(provisioned.hosted.clone_url.as_str())
        );
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let config = Config::default();
        let ctx = Context::new(&config, &NullReporter);
        let hosting = MockHosting::new("octo");
        let repo = MockGitOps::new();
        let provisioner = Provisioner::new(&hosting);

        let first = provisioner.provision(&ctx, &repo, "notes").await.unwrap();
        let second = provisioner.provision(&ctx, &repo, "notes").await.unwrap();

        assert_eq!(first.hosted.id, second.hosted.id);
        assert_eq!(second.repository, RepositoryOutcome::Found);
        assert_eq!(second.remote, RemoteOutcome::AlreadyPresent);
        assert_eq!(hosting.create_calls(), 1);
        assert_eq!(
            repo.remote_names()
                .unwrap()
                .iter()
                .filter(|r| *r == "github")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_existing_remote_url_is_not_changed() {
        let config = Config::default();
        let ctx = Context::new(&config, &NullReporter);
        let hosting = MockHosting::new("octo").with_repo("notes");
        let repo = MockGitOps::new().with_remote("github", "https://example.com/url-a.git");

        let provisioned = Provisioner::new(&hosting)
            .provision(&ctx, &repo, "notes")
            .await
            .unwrap();

        assert_ne!(provisioned.hosted.clone_url, "https://example.com/url-a.git");
        assert_eq!(provisioned.remote, RemoteOutcome::AlreadyPresent);
        assert_eq!(
            repo.remote_url("github").as_deref(),
            Some("https://example.com/url-a.git")
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_is_reported() {
        let config = Config::default();
        let reporter = RecordingReporter::default();
        let ctx = Context::new(&config, &reporter);
        let hosting = MockHosting::new("octo").with_lookup_failure("notes");
        let repo = MockGitOps::new();

        let result = Provisioner::new(&hosting)
            .provision(&ctx, &repo, "notes")
            .await;

        assert!(result.is_err());
        assert!(repo.remote_names().unwrap().is_empty());
        assert_eq!(reporter.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_create_race_reuses_existing() {
        let config = Config::default();
        let ctx = Context::new(&config, &NullReporter);
        let hosting = MockHosting::new("octo").with_create_race("notes");
        let repo = MockGitOps::new();

        let provisioned = Provisioner::new(&hosting)
            .provision(&ctx, &repo, "notes")
            .await
            .unwrap();

        assert_eq!(provisioned.repository, RepositoryOutcome::Found);
        assert_eq!(provisioned.remote, RemoteOutcome::Added);
    }

    #[tokio::test]
    async fn test_owner_resolved_once() {
        let config = Config::default();
        let ctx = Context::new(&config, &NullReporter);
        let hosting = MockHosting::new("octo");
        let provisioner = Provisioner::new(&hosting);

        provisioner
            .provision(&ctx, &MockGitOps::new(), "a")
            .await
            .unwrap();
        provisioner
            .provision(&ctx, &MockGitOps::new(), "b")
            .await
            .unwrap();

        assert_eq!(hosting.user_calls(), 1);
    }
}
