//! One-level scan of the root folder for git working copies.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A working copy found under the root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    /// Path to the working copy.
    pub path: PathBuf,
    /// Final path segment, used as the hosted repository name.
    pub name: String,
}

impl LocalRepo {
    /// Describe the working copy at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// List the first-level children of `root` that contain git metadata.
///
/// A `.git` directory or a `.git` gitdir file (worktrees, submodules) both
/// qualify. Results are sorted by name.
///
/// # Errors
/// Returns error if `root` cannot be read.
pub fn discover(root: &Path) -> Result<Vec<LocalRepo>> {
    let mut repos = Vec::new();

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() && path.join(".git").exists() {
            repos.push(LocalRepo::new(path));
        }
    }

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(root = %root.display(), found = repos.len(), "scanned for repositories");
    Ok(repos)
}

/// Keep only repositories whose name is in `only`. An empty filter keeps all.
#[must_use]
pub fn filter_by_name(repos: Vec<LocalRepo>, only: &[String]) -> Vec<LocalRepo> {
    if only.is_empty() {
        return repos;
    }
    repos
        .into_iter()
        .filter(|r| only.iter().any(|n| n == &r.name))
        .collect()
}
