//! Console reporting for sync outcomes
//!
//! The engine hands every outcome to a [`Reporter`]; this module owns the
//! wording of the status lines so the engine never formats text itself.

use std::io::{self, Write};
use tracing::warn;

use crate::sync::{Outcome, SyncSummary};

/// Receives outcomes as the engine produces them
pub trait Reporter {
    /// Called once per repository, in processing order
    fn repository(&mut self, name: &str, outcome: &Outcome);

    /// Called once after the last repository
    fn finished(&mut self, summary: &SyncSummary);
}

/// Short status phrase for an outcome
pub fn status_text(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Cloned | Outcome::Pulled => "OK!",
        Outcome::SkippedFilteredLanguage => "SKIPPED (not the specified language)",
        Outcome::SkippedNotARepo => "SKIPPED (dir exists, not a repo)",
        Outcome::SkippedDirty => "SKIPPED (repo has working changes)",
        Outcome::SkippedWrongBranch { .. } => "SKIPPED (repo not on master branch)",
        Outcome::FailedMkdir { .. } => "FAILED (to create user repo directory)",
        Outcome::FailedClone { .. } => "FAILED (to clone new repo)",
        Outcome::FailedPull { .. } => "FAILED (to pull repo updates)",
        Outcome::Malformed { .. } => "FAILED (malformed repository name)",
    }
}

/// Full status line, followed by any captured diagnostics indented by two spaces
pub fn status_line(name: &str, outcome: &Outcome) -> String {
    let mut line = format!("• {} {}", name, status_text(outcome));

    if let Some(diagnostics) = outcome.diagnostics() {
        for detail in diagnostics.lines().filter(|l| !l.trim().is_empty()) {
            line.push_str("\n  ");
            line.push_str(detail.trim_end());
        }
    }

    line
}

/// Writes status lines to a stream, stdout by default
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write status line: {}", e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn repository(&mut self, name: &str, outcome: &Outcome) {
        self.write_line(&status_line(name, outcome));
    }

    fn finished(&mut self, _summary: &SyncSummary) {
        self.write_line("Done!");
    }
}
