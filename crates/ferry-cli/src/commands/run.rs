//! `ferry run` command - provision and sync every repository under the root.

use anyhow::{Context as _, Result};
use ferry_core::{Context, Runner, discover, filter_by_name};
use ferry_git::Repository;
use ferry_github::{Auth, GitHubClient};

use super::{Options, load_config};
use crate::output::{self, TerminalReporter};

/// Run the command. Returns whether every repository synced.
pub fn run(options: &Options, quiet: bool) -> Result<bool> {
    let config = load_config(options)?;

    let token_env = &config.github.token_env;
    let auth = Auth::EnvVar(token_env.clone());
    let client = match &config.github.api_url {
        Some(url) => GitHubClient::with_base_url(&auth, url),
        None => GitHubClient::new(&auth),
    }
    .with_context(|| format!("{token_env} must hold a GitHub access token"))?;

    let root = config.root()?;
    let repos = filter_by_name(
        discover(root).with_context(|| format!("Failed to read {}", root.display()))?,
        &options.only,
    );

    if repos.is_empty() {
        output::info(&format!("No git repositories found in {}", root.display()));
        return Ok(true);
    }

    let reporter = TerminalReporter::new(quiet);
    let ctx = Context::new(&config, &reporter);
    let runner = Runner::new(ctx, &client);

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(runner.run(&repos, |local| Repository::open(&local.path)));

    output::summary(&summary);
    Ok(summary.is_success())
}
