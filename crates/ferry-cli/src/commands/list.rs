//! `ferry list` command - show the repositories a run would process.

use anyhow::{Context, Result};
use colored::Colorize;
use ferry_core::{discover, filter_by_name};

use super::{Options, load_config};
use crate::output;

/// Run the command. Never touches the network.
pub fn run(options: &Options) -> Result<bool> {
    let config = load_config(options)?;
    let root = config.root()?;

    let repos = filter_by_name(
        discover(root).with_context(|| format!("Failed to read {}", root.display()))?,
        &options.only,
    );

    if repos.is_empty() {
        output::info(&format!("No git repositories found in {}", root.display()));
        return Ok(true);
    }

    for repo in &repos {
        output::essential(&format!(
            "{}  {}",
            repo.name.bold(),
            repo.path.display().to_string().dimmed()
        ));
    }

    Ok(true)
}
