//! Sync engine mirroring the default branch from one remote to another.
//!
//! History moves through a disposable local transfer branch:
//!
//! 1. resolve the default branch
//! 2. delete transfer branches left over from earlier runs
//! 3. fetch the source remote
//! 4. create the transfer branch at `<source>/<default>` and check it out
//! 5. pull `<default>` from the source into the transfer branch
//! 6. push the transfer branch to the target under its own name
//! 7. check out the default branch and delete the transfer branch
//!
//! The engine owns the transfer branch exclusively while it runs. Cleanup
//! failures are warnings; everything else aborts this repository only.

use std::fmt;

use ferry_git::GitOps;

use crate::error::SyncError;
use crate::report::Context;

/// Local branch used to stage history between fetch and push.
pub const TRANSFER_BRANCH: &str = "sync_temp";

/// Transfer branch name used by earlier releases.
pub const LEGACY_TRANSFER_BRANCH: &str = "sync_origin_github";

/// Every transfer branch name removed before a sync starts.
pub const STALE_TRANSFER_BRANCHES: [&str; 2] = [TRANSFER_BRANCH, LEGACY_TRANSFER_BRANCH];

/// Used when the default branch cannot be determined at all.
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// A step of the sync protocol that can fail.
///
/// Default-branch resolution and stale-branch cleanup never fail and so
/// have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Fetch,
    CreateTransferBranch,
    Pull,
    Push,
    RestoreDefaultBranch,
    DeleteTransferBranch,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fetch => "fetching source",
            Self::CreateTransferBranch => "creating transfer branch",
            Self::Pull => "pulling into transfer branch",
            Self::Push => "pushing transfer branch",
            Self::RestoreDefaultBranch => "restoring default branch",
            Self::DeleteTransferBranch => "deleting transfer branch",
        };
        f.write_str(s)
    }
}

/// Result of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Default branch that was mirrored.
    pub default_branch: String,
    /// Leftover transfer branches deleted before syncing.
    pub stale_removed: Vec<String>,
    /// Set when the final cleanup failed; the branch is removed next run.
    pub cleanup_warning: Option<String>,
}

/// Determine the branch to mirror.
///
/// Prefers a local `main`, then `master`, then the checked-out branch,
/// then [`FALLBACK_DEFAULT_BRANCH`]. A checked-out transfer branch is never
/// taken as the default. When one is checked out (an interrupted run), the
/// branch named by `<source>/HEAD` or the only other local branch is used
/// so the repository can step off the transfer branch.
pub fn resolve_default_branch<G: GitOps>(repo: &G, source: &str) -> String {
    let branches = repo.list_branches().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "could not list branches");
        Vec::new()
    });

    for candidate in ["main", "master"] {
        if branches.iter().any(|b| b == candidate) {
            return candidate.to_string();
        }
    }

    match repo.current_branch() {
        Ok(active) if !is_transfer_branch(&active) => active,
        Ok(_) => stranded_default(repo, source, &branches),
        Err(_) => FALLBACK_DEFAULT_BRANCH.to_string(),
    }
}

/// Default branch for a repository left checked out on a transfer branch.
fn stranded_default<G: GitOps>(repo: &G, source: &str, branches: &[String]) -> String {
    if let Some(head) = repo
        .remote_head(source)
        .filter(|h| !is_transfer_branch(h) && branches.contains(h))
    {
        return head;
    }

    let mut others = branches.iter().filter(|b| !is_transfer_branch(b));
    match (others.next(), others.next()) {
        (Some(only), None) => only.clone(),
        _ => FALLBACK_DEFAULT_BRANCH.to_string(),
    }
}

fn is_transfer_branch(name: &str) -> bool {
    STALE_TRANSFER_BRANCHES.contains(&name)
}

/// Delete transfer branches left behind by earlier runs.
///
/// Best-effort: each failure is reported as a warning and skipped.
/// Returns the names actually deleted.
pub fn cleanup_stale_branches<G: GitOps>(
    ctx: &Context<'_>,
    repo: &G,
    name: &str,
    default_branch: &str,
) -> Vec<String> {
    let mut removed = Vec::new();

    for branch in STALE_TRANSFER_BRANCHES {
        if !repo.branch_exists(branch) {
            continue;
        }
        ctx.info(name, &format!("Removing old branch '{branch}'"));

        match remove_branch(repo, branch, default_branch) {
            Ok(()) => removed.push(branch.to_string()),
            Err(e) => ctx.warn(name, &format!("Could not delete branch '{branch}': {e}")),
        }
    }

    removed
}

/// Step off `branch` if it is checked out, then force-delete it.
fn remove_branch<G: GitOps>(
    repo: &G,
    branch: &str,
    default_branch: &str,
) -> ferry_git::Result<()> {
    if repo.current_branch().ok().as_deref() == Some(branch) {
        repo.checkout(default_branch)?;
    }
    repo.delete_branch(branch, true)
}

/// Mirror the default branch of `source` to `target` through the transfer branch.
///
/// Failures are reported through `ctx` with the failing step and returned;
/// the caller moves on to the next repository.
///
/// # Errors
/// Returns the failing step and its git error. Stale-branch cleanup and
/// the final cleanup never produce an error.
pub fn sync_repository<G: GitOps>(
    ctx: &Context<'_>,
    repo: &G,
    name: &str,
    source: &str,
    target: &str,
) -> Result<SyncReport, SyncError> {
    let default_branch = resolve_default_branch(repo, source);
    ctx.info(name, &format!("Detected default branch '{default_branch}'"));

    let stale_removed = cleanup_stale_branches(ctx, repo, name, &default_branch);

    ctx.info(name, &format!("Fetching from {source}"));
    if let Err(e) = repo.fetch(source).map_err(SyncError::at(SyncStep::Fetch)) {
        return Err(fail(ctx, name, e));
    }

    if let Err(e) = transfer(ctx, repo, name, source, target, &default_branch) {
        if repo.branch_exists(TRANSFER_BRANCH) {
            if let Some(warning) = restore_default_branch(repo, &default_branch) {
                ctx.warn(name, &format!("Could not clean up transfer branch: {warning}"));
            }
        }
        return Err(fail(ctx, name, e));
    }

    let cleanup_warning = restore_default_branch(repo, &default_branch);
    match &cleanup_warning {
        Some(warning) => {
            ctx.warn(name, &format!("Could not clean up transfer branch: {warning}"));
        }
        None => ctx.info(name, "Cleaned up transfer branch"),
    }

    Ok(SyncReport {
        default_branch,
        stale_removed,
        cleanup_warning,
    })
}

/// Steps 4 to 6: branch, pull, push.
fn transfer<G: GitOps>(
    ctx: &Context<'_>,
    repo: &G,
    name: &str,
    source: &str,
    target: &str,
    default_branch: &str,
) -> Result<(), SyncError> {
    let start_point = format!("{source}/{default_branch}");
    repo.create_branch_from(TRANSFER_BRANCH, &start_point)
        .and_then(|()| repo.checkout(TRANSFER_BRANCH))
        .map_err(SyncError::at(SyncStep::CreateTransferBranch))?;

    // Same ref as the start point; keeps the branch exact if the source
    // moved between fetch and branch creation.
    repo.pull(source, default_branch, TRANSFER_BRANCH)
        .map_err(SyncError::at(SyncStep::Pull))?;

    ctx.info(name, &format!("Pushing to {target}"));
    repo.push(target, TRANSFER_BRANCH)
        .map_err(SyncError::at(SyncStep::Push))
}

/// Step 7. Returns a description of the failure, if any.
fn restore_default_branch<G: GitOps>(repo: &G, default_branch: &str) -> Option<String> {
    let result = repo
        .checkout(default_branch)
        .map_err(SyncError::at(SyncStep::RestoreDefaultBranch))
        .and_then(|()| {
            repo.delete_branch(TRANSFER_BRANCH, true)
                .map_err(SyncError::at(SyncStep::DeleteTransferBranch))
        });
    result.err().map(|e| e.to_string())
}

fn fail(ctx: &Context<'_>, name: &str, err: SyncError) -> SyncError {
    ctx.error(name, &format!("Error syncing repository: {err}"));
    err
}
