//! Driver loop: provision then sync every discovered repository.
//!
//! Repositories are processed one at a time and in order. No failure
//! crosses a repository boundary.

use ferry_git::GitOps;
use ferry_github::HostingApi;

use crate::discovery::LocalRepo;
use crate::provision::{Provisioner, RepositoryOutcome};
use crate::report::Context;
use crate::sync::{self, SyncStep};

/// What happened to one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOutcome {
    /// Provisioned and synced.
    Synced,
    /// Provisioned, but the sync failed at `step`.
    SyncFailed(SyncStep),
    /// Provisioning failed; sync was skipped.
    ProvisionFailed,
    /// The working copy could not be opened; nothing was attempted.
    OpenFailed,
}

/// Outcome for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoResult {
    /// Repository name.
    pub name: String,
    /// Final outcome.
    pub outcome: RepoOutcome,
    /// Hosted lookup outcome, when provisioning succeeded.
    pub hosted: Option<RepositoryOutcome>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-repository results, in processing order.
    pub results: Vec<RepoResult>,
}

impl RunSummary {
    /// Repositories synced.
    #[must_use]
    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::Synced))
    }

    /// Repositories whose sync failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::SyncFailed(_)))
    }

    /// Repositories whose sync was never attempted.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::ProvisionFailed | RepoOutcome::OpenFailed))
    }

    /// Hosted repositories created during this run.
    #[must_use]
    pub fn created(&self) -> usize {
        self.hosted(RepositoryOutcome::Created)
    }

    /// Hosted repositories that already existed.
    #[must_use]
    pub fn found(&self) -> usize {
        self.hosted(RepositoryOutcome::Found)
    }

    fn hosted(&self, outcome: RepositoryOutcome) -> usize {
        self.results
            .iter()
            .filter(|r| r.hosted == Some(outcome))
            .count()
    }

    /// Whether every repository synced.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.synced() == self.results.len()
    }

    fn count(&self, pred: impl Fn(RepoOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r.outcome)).count()
    }
}

/// Runs provisioning and sync over a repository snapshot.
pub struct Runner<'a, H: HostingApi> {
    ctx: Context<'a>,
    provisioner: Provisioner<'a, H>,
}

#[allow(clippy::future_not_send)]
impl<'a, H: HostingApi> Runner<'a, H> {
    /// Create a runner.
    #[must_use]
    pub fn new(ctx: Context<'a>, client: &'a H) -> Self {
        Self {
            ctx,
            provisioner: Provisioner::new(client),
        }
    }

    /// Process every repository in `repos`, opening each with `open`.
    pub async fn run<G, F>(&self, repos: &[LocalRepo], mut open: F) -> RunSummary
    where
        G: GitOps,
        F: FnMut(&LocalRepo) -> ferry_git::Result<G>,
    {
        let mut summary = RunSummary::default();

        for local in repos {
            self.ctx.info(&local.name, "Processing repository");

            let result = match open(local) {
                Ok(repo) => self.process(local, &repo).await,
                Err(e) => {
                    self.ctx
                        .error(&local.name, &format!("Could not open repository: {e}"));
                    RepoResult {
                        name: local.name.clone(),
                        outcome: RepoOutcome::OpenFailed,
                        hosted: None,
                    }
                }
            };

            summary.results.push(result);
        }

        summary
    }

    /// Provision, then sync if provisioning succeeded.
    pub async fn process<G: GitOps>(&self, local: &LocalRepo, repo: &G) -> RepoResult {
        let name = local.name.as_str();

        let Ok(provisioned) = self.provisioner.provision(&self.ctx, repo, name).await else {
            self.ctx
                .warn(name, "Skipping sync due to GitHub repository issues");
            return RepoResult {
                name: local.name.clone(),
                outcome: RepoOutcome::ProvisionFailed,
                hosted: None,
            };
        };

        let outcome = match sync::sync_repository(
            &self.ctx,
            repo,
            name,
            self.ctx.source_remote(),
            self.ctx.hosted_remote(),
        ) {
            Ok(report) => {
                self.ctx.success(
                    name,
                    &format!(
                        "Synced '{}' to {} as '{}'",
                        report.default_branch,
                        self.ctx.hosted_remote(),
                        sync::TRANSFER_BRANCH
                    ),
                );
                RepoOutcome::Synced
            }
            Err(e) => RepoOutcome::SyncFailed(e.step),
        };

        RepoResult {
            name: local.name.clone(),
            outcome,
            hosted: Some(provisioned.repository),
        }
    }
}
