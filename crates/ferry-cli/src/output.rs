//! Terminal output formatting utilities.

use colored::Colorize;
use ferry_core::{RepoOutcome, Reporter, RunSummary, Severity};

/// Prints per-repository status lines to the terminal.
///
/// Info and success lines go to stdout and are suppressed in quiet mode.
/// Warnings and errors always go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter {
    quiet: bool,
}

impl TerminalReporter {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, repo: &str, severity: Severity, message: &str) {
        let line = status_line(repo, severity, message);
        match severity {
            Severity::Info | Severity::Success => {
                if !self.quiet {
                    println!("{line}");
                }
            }
            Severity::Warning | Severity::Error => eprintln!("{line}"),
        }
    }
}

/// Format one status line: `<symbol> <repo>: <message>`.
#[must_use]
pub fn status_line(repo: &str, severity: Severity, message: &str) -> String {
    format!("{} {}: {message}", symbol(severity), repo.bold())
}

fn symbol(severity: Severity) -> String {
    match severity {
        Severity::Info => "→".blue().to_string(),
        Severity::Success => "✓".green().to_string(),
        Severity::Warning => "!".yellow().to_string(),
        Severity::Error => "✗".red().to_string(),
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print essential machine-readable output (always prints).
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// `N synced, M failed, K skipped`.
#[must_use]
pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "{} synced, {} failed, {} skipped",
        summary.synced(),
        summary.failed(),
        summary.skipped()
    )
}

/// Print the end-of-run summary, listing every repository that did not sync.
pub fn summary(summary: &RunSummary) {
    println!("{}", "─".repeat(50).dimmed());

    for result in &summary.results {
        let reason = match result.outcome {
            RepoOutcome::Synced => continue,
            RepoOutcome::SyncFailed(step) => format!("failed while {step}"),
            RepoOutcome::ProvisionFailed => "skipped, GitHub repository unavailable".into(),
            RepoOutcome::OpenFailed => "skipped, not a usable repository".into(),
        };
        eprintln!("  {} {}: {reason}", "✗".red(), result.name);
    }

    let line = summary_line(summary);
    if summary.is_success() {
        println!("{} {line}", "✓".green());
    } else {
        println!("{} {line}", "!".yellow());
    }

    let created = summary.created();
    if created > 0 {
        println!("  {created} GitHub repositories created");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::{RepoResult, RepositoryOutcome, SyncStep};

    fn result(name: &str, outcome: RepoOutcome) -> RepoResult {
        RepoResult {
            name: name.into(),
            outcome,
            hosted: Some(RepositoryOutcome::Found),
        }
    }

    #[test]
    fn test_summary_line_counts() {
        let summary = RunSummary {
            results: vec![
                result("a", RepoOutcome::Synced),
                result("b", RepoOutcome::SyncFailed(SyncStep::Fetch)),
                result("c", RepoOutcome::Synced),
                result("d", RepoOutcome::ProvisionFailed),
            ],
        };

        assert_eq!(summary_line(&summary), "2 synced, 1 failed, 1 skipped");
    }

    #[test]
    fn test_summary_line_empty() {
        assert_eq!(
            summary_line(&RunSummary::default()),
            "0 synced, 0 failed, 0 skipped"
        );
    }

    #[test]
    fn status_line_symbols_match_severity() {
        colored::control::set_override(false);

        assert_eq!(status_line("notes", Severity::Info, "Fetching"), "→ notes: Fetching");
        assert_eq!(status_line("notes", Severity::Success, "Synced"), "✓ notes: Synced");
        assert_eq!(status_line("notes", Severity::Warning, "Leftover"), "! notes: Leftover");
        assert_eq!(status_line("notes", Severity::Error, "Failed"), "✗ notes: Failed");

        colored::control::unset_override();
    }

    #[test]
    fn test_quiet_reporter_flag() {
        assert!(TerminalReporter::new(true).quiet);
        assert!(!TerminalReporter::default().quiet);
    }
}
