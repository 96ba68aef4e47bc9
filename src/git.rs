use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::error::{Error, Result};

/// The only branch gitcc will fast-forward
pub const MAIN_BRANCH: &str = "master";

/// Remote pulled from
pub const REMOTE: &str = "origin";

/// A git invocation held as an explicit argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
}

impl GitCommand {
    pub const PROGRAM: &'static str = "git";

    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `git clone <url>`, run from the owner directory
    pub fn clone_repo(url: &str) -> Self {
        Self::new(["clone", url])
    }

    /// `git status`, fails outside a working tree
    pub fn status() -> Self {
        Self::new(["status"])
    }

    /// `git diff-index --quiet HEAD --`, non-zero when the tree differs from HEAD
    pub fn diff_index_head() -> Self {
        Self::new(["diff-index", "--quiet", "HEAD", "--"])
    }

    /// `git rev-parse --abbrev-ref HEAD`
    pub fn current_branch() -> Self {
        Self::new(["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// `git pull --ff-only <remote> <branch>`
    pub fn pull_ff_only(remote: &str, branch: &str) -> Self {
        Self::new(["pull", "--ff-only", remote, branch])
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::PROGRAM)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished git process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Seam between the sync engine and the git executable
///
/// `Err` means the process could not be started at all; a git command that
/// ran and exited non-zero is an `Ok` with `success == false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, command: &GitCommand, dir: &Path) -> Result<GitOutput>;
}

/// Runs git as a child process
#[derive(Debug, Clone, Default)]
pub struct GitClient;

impl GitClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GitRunner for GitClient {
    async fn run(&self, command: &GitCommand, dir: &Path) -> Result<GitOutput> {
        debug!("Running `{}` in {}", command, dir.display());

        let output = AsyncCommand::new(GitCommand::PROGRAM)
            .args(command.args())
            .current_dir(dir)
            // Fail instead of waiting on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::GitSpawn {
                args: command.args().join(" "),
                source,
            })?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Whether `dir` is inside an initialised git working tree
pub async fn is_repository<G: GitRunner + ?Sized>(git: &G, dir: &Path) -> bool {
    match git.run(&GitCommand::status(), dir).await {
        Ok(output) => output.success,
        Err(e) => {
            debug!("git status probe failed in {}: {}", dir.display(), e);
            false
        }
    }
}

/// Whether the working tree differs from HEAD
///
/// A probe that errors or exits non-zero counts as "has changes".
pub async fn has_changes<G: GitRunner + ?Sized>(git: &G, dir: &Path) -> bool {
    match git.run(&GitCommand::diff_index_head(), dir).await {
        Ok(output) => !output.success,
        Err(e) => {
            debug!("git diff-index probe failed in {}: {}", dir.display(), e);
            true
        }
    }
}

/// Checked-out branch name, empty when it cannot be determined
pub async fn current_branch<G: GitRunner + ?Sized>(git: &G, dir: &Path) -> String {
    match git.run(&GitCommand::current_branch(), dir).await {
        Ok(output) => output.stdout.trim().to_string(),
        Err(e) => {
            debug!("git rev-parse probe failed in {}: {}", dir.display(), e);
            String::new()
        }
    }
}
