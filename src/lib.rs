//! gitcc - Clone all GitHub repositories for a given user
//!
//! gitcc mirrors a user's public repositories into `$GOPATH/src/github.com/<user>`:
//! missing repositories are cloned, clean checkouts of `master` are
//! fast-forwarded, and anything with local work is left alone.
//!
//! ## Modules
//!
//! - [`config`]: Base directory and language filter resolution
//! - [`github`]: Repository listing via the GitHub REST API
//! - [`git`]: Git command construction and read-only probes
//! - [`sync`]: Per-repository clone/pull decisions
//! - [`report`]: Status line rendering

pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod report;
pub mod sync;

pub use config::Config;
pub use error::{Error, Result};
pub use git::{GitClient, GitCommand, GitOutput, GitRunner};
pub use github::{GitHubClient, RepositoryDescriptor};
pub use report::{ConsoleReporter, Reporter};
pub use sync::{Outcome, RepoState, SyncEngine, SyncSummary};
