//! Mock implementations for testing the provisioner, sync engine and runner.
//!
//! These mocks implement the traits from ferry-git and ferry-github
//! to enable unit testing without real repositories or network access.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use ferry_git::{Error as GitError, GitOps, Remote, Result as GitResult};
use ferry_github::{CreateRepository, HostedRepository, HostingApi, Result as HubResult, User};

use crate::report::{Reporter, Severity};

/// Mock implementation of `GitOps` for testing.
///
/// Tracks branches, remotes and the checked-out branch in memory, and
/// records every mutating or network call in order.
#[derive(Default)]
pub struct MockGitOps {
    current_branch: RefCell<Option<String>>,
    branches: RefCell<BTreeSet<String>>,
    remotes: RefCell<BTreeMap<String, String>>,
    /// Branches each remote will serve on fetch.
    upstream: RefCell<BTreeMap<String, Vec<String>>>,
    /// Remote-tracking refs populated by fetch (`origin/main`).
    remote_refs: RefCell<BTreeSet<String>>,
    remote_heads: BTreeMap<String, String>,
    pushed: RefCell<Vec<(String, String)>>,
    calls: RefCell<Vec<String>>,
    fail_list: bool,
    fail_fetch: bool,
    fail_pull: bool,
    fail_push: bool,
    fail_delete: HashSet<String>,
}

#[allow(dead_code)]
impl MockGitOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(self, name: &str) -> Self {
        self.branches.borrow_mut().insert(name.to_string());
        self
    }

    pub fn with_current_branch(self, name: &str) -> Self {
        *self.current_branch.borrow_mut() = Some(name.to_string());
        self
    }

    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.remotes
            .borrow_mut()
            .insert(name.to_string(), url.to_string());
        self
    }

    pub fn with_upstream(self, remote: &str, branches: &[&str]) -> Self {
        self.upstream.borrow_mut().insert(
            remote.to_string(),
            branches.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn with_list_failure(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn with_fetch_failure(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn with_remote_head(mut self, remote: &str, branch: &str) -> Self {
        self.remote_heads
            .insert(remote.to_string(), branch.to_string());
        self
    }

    pub fn with_pull_failure(mut self) -> Self {
        self.fail_pull = true;
        self
    }

    pub fn with_push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn with_delete_failure(mut self, branch: &str) -> Self {
        self.fail_delete.insert(branch.to_string());
        self
    }

    pub fn remote_url(&self, name: &str) -> Option<String> {
        self.remotes.borrow().get(name).cloned()
    }

    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn require_remote(&self, remote: &str) -> GitResult<()> {
        if self.remotes.borrow().contains_key(remote) {
            Ok(())
        } else {
            Err(GitError::RemoteNotFound(remote.to_string()))
        }
    }
}

impl GitOps for MockGitOps {
    fn workdir(&self) -> Option<&Path> {
        None
    }

    fn current_branch(&self) -> GitResult<String> {
        self.current_branch
            .borrow()
            .clone()
            .ok_or(GitError::DetachedHead)
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.branches.borrow().contains(name)
    }

    fn list_branches(&self) -> GitResult<Vec<String>> {
        if self.fail_list {
            return Err(GitError::RefNotFound("refs/heads".into()));
        }
        Ok(self.branches.borrow().iter().cloned().collect())
    }

    fn create_branch_from(&self, name: &str, start_point: &str) -> GitResult<()> {
        self.record(format!("create {name} from {start_point}"));
        if self.branch_exists(name) {
            return Err(GitError::BranchExists(name.to_string()));
        }
        if !self.remote_refs.borrow().contains(start_point) && !self.branch_exists(start_point) {
            return Err(GitError::RefNotFound(start_point.to_string()));
        }
        self.branches.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn checkout(&self, branch: &str) -> GitResult<()> {
        self.record(format!("checkout {branch}"));
        if !self.branch_exists(branch) {
            return Err(GitError::BranchNotFound(branch.to_string()));
        }
        *self.current_branch.borrow_mut() = Some(branch.to_string());
        Ok(())
    }

    fn delete_branch(&self, name: &str, _force: bool) -> GitResult<()> {
        self.record(format!("delete {name}"));
        if self.fail_delete.contains(name) {
            return Err(GitError::BranchNotMerged(name.to_string()));
        }
        if self.current_branch.borrow().as_deref() == Some(name) {
            return Err(GitError::BranchCheckedOut(name.to_string()));
        }
        if !self.branches.borrow_mut().remove(name) {
            return Err(GitError::BranchNotFound(name.to_string()));
        }
        Ok(())
    }

    fn remotes(&self) -> GitResult<Vec<Remote>> {
        Ok(self
            .remotes
            .borrow()
            .iter()
            .map(|(name, url)| Remote {
                name: name.clone(),
                url: url.clone(),
            })
            .collect())
    }

    fn remote_head(&self, remote: &str) -> Option<String> {
        self.remote_heads.get(remote).cloned()
    }

    fn add_remote(&self, name: &str, url: &str) -> GitResult<()> {
        self.record(format!("remote add {name}"));
        if self.remotes.borrow().contains_key(name) {
            return Err(GitError::RemoteExists(name.to_string()));
        }
        self.remotes
            .borrow_mut()
            .insert(name.to_string(), url.to_string());
        Ok(())
    }

    fn fetch(&self, remote: &str) -> GitResult<()> {
        self.record(format!("fetch {remote}"));
        self.require_remote(remote)?;
        if self.fail_fetch {
            return Err(GitError::FetchFailed(format!("could not read from {remote}")));
        }
        if let Some(branches) = self.upstream.borrow().get(remote) {
            let mut refs = self.remote_refs.borrow_mut();
            for branch in branches {
                refs.insert(format!("{remote}/{branch}"));
            }
        }
        Ok(())
    }

    fn pull(&self, remote: &str, src_branch: &str, dst_branch: &str) -> GitResult<()> {
        self.record(format!("pull {remote} {src_branch}:{dst_branch}"));
        self.require_remote(remote)?;
        if self.fail_pull {
            return Err(GitError::PullFailed("Not possible to fast-forward, aborting.".into()));
        }
        if !self
            .remote_refs
            .borrow()
            .contains(&format!("{remote}/{src_branch}"))
        {
            return Err(GitError::PullFailed(format!(
                "couldn't find remote ref {src_branch}"
            )));
        }
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.record(format!("push {remote} {branch}"));
        self.require_remote(remote)?;
        if self.fail_push {
            return Err(GitError::PushFailed("rejected".into()));
        }
        self.pushed
            .borrow_mut()
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }
}

/// In-memory hosting service.
pub struct MockHosting {
    login: String,
    repos: Mutex<BTreeMap<String, HostedRepository>>,
    next_id: AtomicU64,
    user_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_lookup: HashSet<String>,
    create_race: HashSet<String>,
}

#[allow(dead_code)]
impl MockHosting {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            repos: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            user_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            fail_lookup: HashSet::new(),
            create_race: HashSet::new(),
        }
    }

    /// Pre-existing hosted repository.
    pub fn with_repo(self, name: &str) -> Self {
        self.insert(name);
        self
    }

    pub fn with_lookup_failure(mut self, name: &str) -> Self {
        self.fail_lookup.insert(name.to_string());
        self
    }

    /// Creation reports "already exists" because another process won.
    pub fn with_create_race(mut self, name: &str) -> Self {
        self.create_race.insert(name.to_string());
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    fn insert(&self, name: &str) -> HostedRepository {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let hosted = HostedRepository {
            id,
            name: name.to_string(),
            full_name: format!("{}/{name}", self.login),
            private: true,
            clone_url: format!("https://github.com/{}/{name}.git", self.login),
            html_url: format!("https://github.com/{}/{name}", self.login),
        };
        self.repos
            .lock()
            .unwrap()
            .insert(name.to_string(), hosted.clone());
        hosted
    }
}

impl HostingApi for MockHosting {
    async fn current_user(&self) -> HubResult<User> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        Ok(User {
            login: self.login.clone(),
        })
    }

    async fn find_repo(&self, owner: &str, name: &str) -> HubResult<Option<HostedRepository>> {
        if self.fail_lookup.contains(name) {
            return Err(ferry_github::Error::ApiError {
                status: 500,
                message: "lookup failed".into(),
            });
        }
        assert_eq!(owner, self.login);
        Ok(self.repos.lock().unwrap().get(name).cloned())
    }

    async fn create_repo(&self, repo: CreateRepository) -> HubResult<HostedRepository> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        assert!(repo.private);
        if self.create_race.contains(&repo.name) {
            self.insert(&repo.name);
            return Err(ferry_github::Error::AlreadyExists(repo.name));
        }
        Ok(self.insert(&repo.name))
    }
}

/// Reporter that keeps every status line.
#[derive(Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<(String, Severity, String)>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn count(&self, severity: Severity) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == severity)
            .count()
    }

    pub fn lines(&self) -> Vec<(String, Severity, String)> {
        self.lines.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, repo: &str, severity: Severity, message: &str) {
        self.lines
            .borrow_mut()
            .push((repo.to_string(), severity, message.to_string()));
    }
}
