//! Sync Engine - classifies each repository and clones or pulls it
//!
//! Repositories are processed one at a time in the order the lister returned
//! them. Local state is probed read-only (existence, work tree, changes,
//! branch) and only a repository that passes every probe is pulled, always
//! fast-forward only.

use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::git::{self, GitClient, GitCommand, GitRunner, MAIN_BRANCH, REMOTE};
use crate::github::{normalize_user, RepositoryDescriptor};
use crate::report::Reporter;

/// Local state of a repository path, derived fresh for every descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoState {
    /// Nothing at the path yet
    Absent,
    /// The path exists but `git status` fails there
    NotAGitRepo,
    /// The work tree differs from HEAD, or that could not be determined
    DirtyWorkingTree,
    /// Checked out on something other than the main branch
    NotOnMainBranch { branch: String },
    /// Safe to fast-forward
    CleanOnMain,
}

/// What happened to a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cloned,
    Pulled,
    SkippedFilteredLanguage,
    SkippedNotARepo,
    SkippedDirty,
    SkippedWrongBranch { branch: String },
    FailedMkdir { error: String },
    FailedClone { stderr: String },
    FailedPull { stderr: String },
    /// `full_name` had no `owner/` prefix or an empty repository part
    Malformed { full_name: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Cloned | Outcome::Pulled)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Outcome::SkippedFilteredLanguage
                | Outcome::SkippedNotARepo
                | Outcome::SkippedDirty
                | Outcome::SkippedWrongBranch { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success() && !self.is_skipped()
    }

    /// Captured diagnostic text, if the outcome carries any
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Outcome::FailedMkdir { error } => Some(error),
            Outcome::FailedClone { stderr } | Outcome::FailedPull { stderr } => Some(stderr),
            _ => None,
        }
    }
}

/// Results from a complete sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub total_repositories: usize,
    pub successful_operations: usize,
    pub failed_operations: usize,
    pub skipped_operations: usize,
    pub duration: Duration,
    pub results: Vec<(RepositoryDescriptor, Outcome)>,
}

impl SyncSummary {
    fn compile(results: Vec<(RepositoryDescriptor, Outcome)>, duration: Duration) -> Self {
        let count = |pred: fn(&Outcome) -> bool| results.iter().filter(|(_, o)| pred(o)).count();

        Self {
            total_repositories: results.len(),
            successful_operations: count(Outcome::is_success),
            failed_operations: count(Outcome::is_failure),
            skipped_operations: count(Outcome::is_skipped),
            duration,
            results,
        }
    }
}

/// Drives clone/pull decisions for a list of repositories
pub struct SyncEngine<G = GitClient> {
    config: Config,
    git: G,
}

impl SyncEngine<GitClient> {
    /// Create a sync engine that shells out to the system git
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, GitClient::new())
    }
}

impl<G: GitRunner> SyncEngine<G> {
    pub fn with_runner(config: Config, git: G) -> Self {
        Self { config, git }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Synchronize every descriptor in order, reporting each outcome
    pub async fn sync<R: Reporter + ?Sized>(
        &self,
        user: &str,
        descriptors: Vec<RepositoryDescriptor>,
        reporter: &mut R,
    ) -> SyncSummary {
        let start_time = Instant::now();
        let user = normalize_user(user);

        info!(
            "Syncing {} repositories for {} into {}",
            descriptors.len(),
            user,
            self.config.owner_directory(user).display()
        );

        let mut results = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let outcome = self.process(user, &descriptor).await;
            let name = descriptor.repo_name().unwrap_or(&descriptor.full_name);
            reporter.repository(name, &outcome);
            results.push((descriptor, outcome));
        }

        let summary = SyncSummary::compile(results, start_time.elapsed());
        info!(
            "Sync completed in {:.2}s: {} successful, {} failed, {} skipped",
            summary.duration.as_secs_f64(),
            summary.successful_operations,
            summary.failed_operations,
            summary.skipped_operations
        );
        reporter.finished(&summary);

        summary
    }

    /// Decide and carry out the action for a single repository
    pub async fn sync_repository(&self, user: &str, descriptor: &RepositoryDescriptor) -> Outcome {
        self.process(normalize_user(user), descriptor).await
    }

    async fn process(&self, user: &str, descriptor: &RepositoryDescriptor) -> Outcome {
        let repo = match descriptor.repo_name() {
            Ok(repo) => repo,
            Err(e) => {
                warn!("{}", e);
                return Outcome::Malformed {
                    full_name: descriptor.full_name.clone(),
                };
            }
        };

        if let Some(filter) = self.config.language.as_deref() {
            if !descriptor.matches_language(filter) {
                debug!(
                    "Skipping {}: language {:?} does not match {:?}",
                    descriptor.full_name, descriptor.language, filter
                );
                return Outcome::SkippedFilteredLanguage;
            }
        }

        let path = self.config.repo_path(user, repo);
        match self.inspect(&path).await {
            RepoState::Absent => self.clone_repository(user, repo).await,
            RepoState::NotAGitRepo => Outcome::SkippedNotARepo,
            RepoState::DirtyWorkingTree => Outcome::SkippedDirty,
            RepoState::NotOnMainBranch { branch } => {
                debug!(
                    "Skipping {}: on branch {:?}, only {} is pulled",
                    path.display(),
                    branch,
                    MAIN_BRANCH
                );
                Outcome::SkippedWrongBranch { branch }
            }
            RepoState::CleanOnMain => self.pull_repository(&path).await,
        }
    }

    /// Probe the local path; stops at the first probe that rules out a pull
    pub async fn inspect(&self, path: &Path) -> RepoState {
        match tokio::fs::metadata(path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found", path.display());
                return RepoState::Absent;
            }
            // Present but unreadable; the probes decide
            Err(e) => debug!("Cannot stat {}: {}", path.display(), e),
        }

        if !git::is_repository(&self.git, path).await {
            return RepoState::NotAGitRepo;
        }

        if git::has_changes(&self.git, path).await {
            return RepoState::DirtyWorkingTree;
        }

        let branch = git::current_branch(&self.git, path).await;
        if branch != MAIN_BRANCH {
            return RepoState::NotOnMainBranch { branch };
        }

        RepoState::CleanOnMain
    }

    async fn clone_repository(&self, user: &str, repo: &str) -> Outcome {
        let owner_dir = self.config.owner_directory(user);

        if let Err(e) = tokio::fs::create_dir_all(&owner_dir).await {
            warn!("Failed to create {}: {}", owner_dir.display(), e);
            return Outcome::FailedMkdir {
                error: e.to_string(),
            };
        }

        let url = self.config.clone_url(user, repo);
        info!("Cloning {} into {}", url, owner_dir.display());

        match self.git.run(&GitCommand::clone_repo(&url), &owner_dir).await {
            Ok(output) if output.success => Outcome::Cloned,
            Ok(output) => Outcome::FailedClone {
                stderr: output.stderr,
            },
            Err(e) => Outcome::FailedClone {
                stderr: e.to_string(),
            },
        }
    }

    async fn pull_repository(&self, path: &Path) -> Outcome {
        info!("Pulling {} {} in {}", REMOTE, MAIN_BRANCH, path.display());

        match self
            .git
            .run(&GitCommand::pull_ff_only(REMOTE, MAIN_BRANCH), path)
            .await
        {
            Ok(output) if output.success => Outcome::Pulled,
            Ok(output) => Outcome::FailedPull {
                stderr: output.stderr,
            },
            Err(e) => Outcome::FailedPull {
                stderr: e.to_string(),
            },
        }
    }
}
