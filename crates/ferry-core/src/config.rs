//! Configuration management for ferry.
//!
//! Values are layered: TOML file, then environment, then command-line
//! overrides applied by the binary. [`Config::validate`] runs once at
//! startup before any repository is touched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the folder that holds the working copies.
pub const ENV_ROOT: &str = "REPOS_FOLDER";
/// Environment variable overriding the source remote name.
pub const ENV_SOURCE_REMOTE: &str = "FERRY_SOURCE_REMOTE";
/// Environment variable overriding the hosted remote name.
pub const ENV_HOSTED_REMOTE: &str = "FERRY_HOSTED_REMOTE";
/// Environment variable overriding the GitHub API URL.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// ferry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// GitHub-specific settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Default config file location:
    /// `$XDG_CONFIG_HOME/ferry/config.toml`, else `~/.config/ferry/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("ferry").join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an environment lookup. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = get(ENV_ROOT) {
            self.general.root = Some(PathBuf::from(root));
        }
        if let Some(remote) = get(ENV_SOURCE_REMOTE) {
            self.general.source_remote = remote;
        }
        if let Some(remote) = get(ENV_HOSTED_REMOTE) {
            self.general.hosted_remote = remote;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.github.api_url = Some(url);
        }
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let root = self.root()?;
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "folder {} does not exist",
                root.display()
            )));
        }

        let source = self.general.source_remote.trim();
        let hosted = self.general.hosted_remote.trim();
        if source.is_empty() || hosted.is_empty() {
            return Err(Error::Config("remote names must not be empty".into()));
        }
        if source == hosted {
            return Err(Error::Config(format!(
                "source and hosted remote are both '{source}'"
            )));
        }
        if self.github.token_env.trim().is_empty() {
            return Err(Error::Config("github.token_env must not be empty".into()));
        }

        Ok(())
    }

    /// The folder scanned for working copies.
    ///
    /// # Errors
    /// Returns `Error::Config` if unset.
    pub fn root(&self) -> Result<&Path> {
        self.general
            .root
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{ENV_ROOT} is not set")))
    }
}

/// General ferry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Folder whose first-level children are scanned for working copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Remote history is fetched from.
    #[serde(default = "default_source_remote")]
    pub source_remote: String,

    /// Remote name registered for the hosted repository.
    #[serde(default = "default_hosted_remote")]
    pub hosted_remote: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            root: None,
            source_remote: default_source_remote(),
            hosted_remote: default_hosted_remote(),
        }
    }
}

fn default_source_remote() -> String {
    "origin".into()
}

fn default_hosted_remote() -> String {
    "github".into()
}

/// GitHub-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Custom API URL for GitHub Enterprise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token_env: default_token_env(),
        }
    }
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
