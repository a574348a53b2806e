//! Per-repository status reporting and the run context.
//!
//! Components never print directly. They receive a [`Context`] built once
//! at startup and emit status lines through its [`Reporter`].

use crate::config::Config;

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Progress information.
    Info,
    /// A step completed successfully.
    Success,
    /// Best-effort step failed; processing continues.
    Warning,
    /// The current repository's processing was abandoned.
    Error,
}

/// Sink for per-repository status lines.
pub trait Reporter {
    /// Emit one status line for `repo`.
    fn report(&self, repo: &str, severity: Severity, message: &str);
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _repo: &str, _severity: Severity, _message: &str) {}
}

/// Explicit run context passed to every component.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    config: &'a Config,
    reporter: &'a dyn Reporter,
}

impl<'a> Context<'a> {
    /// Create a context.
    #[must_use]
    pub fn new(config: &'a Config, reporter: &'a dyn Reporter) -> Self {
        Self { config, reporter }
    }

    /// Remote history is fetched from.
    #[must_use]
    pub fn source_remote(&self) -> &'a str {
        &self.config.general.source_remote
    }

    /// Remote registered for the hosted repository.
    #[must_use]
    pub fn hosted_remote(&self) -> &'a str {
        &self.config.general.hosted_remote
    }

    /// Report progress.
    pub fn info(&self, repo: &str, message: &str) {
        self.emit(repo, Severity::Info, message);
    }

    /// Report a completed step.
    pub fn success(&self, repo: &str, message: &str) {
        self.emit(repo, Severity::Success, message);
    }

    /// Report a best-effort failure; processing continues.
    pub fn warn(&self, repo: &str, message: &str) {
        self.emit(repo, Severity::Warning, message);
    }

    /// Report that this repository's processing was abandoned.
    pub fn error(&self, repo: &str, message: &str) {
        self.emit(repo, Severity::Error, message);
    }

    fn emit(&self, repo: &str, severity: Severity, message: &str) {
        tracing::debug!(repo, ?severity, "{message}");
        self.reporter.report(repo, severity, message);
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
