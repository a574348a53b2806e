//! ferry CLI - mirror local git repositories to private GitHub repositories.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{Cli, Commands};

/// Exit status when configuration is missing or invalid.
const EXIT_CONFIG: i32 = 2;
/// Exit status for any other failure.
const EXIT_FAILURE: i32 = 1;

fn main() {
    // Variables already set in the environment take precedence.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command.unwrap_or_default() {
        Commands::Run => commands::run::run(&cli.options, cli.quiet),
        Commands::List => commands::list::run(&cli.options),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_FAILURE),
        Err(e) => {
            output::error(&format!("{e:#}"));
            let code = if commands::is_config_error(&e) {
                EXIT_CONFIG
            } else {
                EXIT_FAILURE
            };
            std::process::exit(code);
        }
    }
}

/// Install the stderr diagnostics subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
