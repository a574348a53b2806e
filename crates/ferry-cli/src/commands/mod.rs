//! Command definitions and the shared configuration loader.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use ferry_core::Config;

pub mod completions;
pub mod list;
pub mod run;

/// ferry - mirror local git repositories to private GitHub repositories.
#[derive(Parser)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: Options,

    /// Show debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings, errors and the summary.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Settings that override the config file and environment.
#[derive(Args, Debug, Default)]
pub struct Options {
    /// Folder whose first-level children are the repositories to mirror.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file [default: ~/.config/ferry/config.toml].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remote to fetch history from.
    #[arg(long, global = true, value_name = "NAME")]
    pub source_remote: Option<String>,

    /// Remote name to register for the GitHub repository.
    #[arg(long, global = true, value_name = "NAME")]
    pub hosted_remote: Option<String>,

    /// GitHub API URL (GitHub Enterprise).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Only process these repositories (by folder name).
    #[arg(long, global = true, value_name = "NAME", value_delimiter = ',')]
    pub only: Vec<String>,
}

#[derive(Subcommand, Default)]
pub enum Commands {
    /// Provision and sync every repository (default).
    #[default]
    Run,

    /// List the repositories that would be processed.
    #[command(alias = "ls")]
    List,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve configuration: file, then environment, then flags.
///
/// # Errors
/// Returns a configuration error if the file is unreadable or the result
/// fails validation.
pub fn load_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) if !path.exists() => {
            return Err(ferry_core::Error::Config(format!(
                "config file {} not found",
                path.display()
            ))
            .into());
        }
        Some(path) => Config::load(path),
        None => Config::default_path().map_or_else(|| Ok(Config::default()), Config::load),
    }
    .context("Failed to load config file")?;

    config.apply_env();

    if let Some(root) = &options.root {
        config.general.root = Some(root.clone());
    }
    if let Some(remote) = &options.source_remote {
        config.general.source_remote.clone_from(remote);
    }
    if let Some(remote) = &options.hosted_remote {
        config.general.hosted_remote.clone_from(remote);
    }
    if let Some(url) = &options.api_url {
        config.github.api_url = Some(url.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Whether `err` stems from missing or invalid configuration.
pub fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ferry_core::Error>(),
            Some(ferry_core::Error::Config(_) | ferry_core::Error::Toml(_))
        ) || matches!(
            cause.downcast_ref::<ferry_github::Error>(),
            Some(ferry_github::Error::NoToken(_))
        )
    })
}
