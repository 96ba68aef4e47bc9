use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable holding the root of the local source tree
pub const BASE_DIR_ENV: &str = "GOPATH";

/// GitHub REST API root used by the repository lister
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Host prefix used to build clone URLs
pub const DEFAULT_CLONE_BASE_URL: &str = "https://github.com";

/// Runtime configuration for a sync run
///
/// Built once at startup and handed to the lister and the sync engine, so
/// nothing below `main` reads the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one sub-directory per user (`$GOPATH/src/github.com`)
    pub base_directory: PathBuf,

    /// Case-insensitive filter on the primary language, `None` keeps everything
    pub language: Option<String>,

    /// Root of the repository listing API
    pub api_base_url: String,

    /// Prefix for `<prefix>/<user>/<repo>.git` clone URLs
    pub clone_base_url: String,
}

impl Config {
    /// Create a configuration rooted at `base_directory` with GitHub defaults
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            language: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            clone_base_url: DEFAULT_CLONE_BASE_URL.to_string(),
        }
    }

    /// Set the language filter; only an empty value disables filtering
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.is_empty());
        self
    }

    /// Build the configuration from `$GOPATH`
    ///
    /// An unset or empty variable is reported as `MissingBaseDirectory`.
    pub fn from_env(language: Option<String>) -> Result<Self> {
        let gopath = std::env::var(BASE_DIR_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(Error::MissingBaseDirectory(BASE_DIR_ENV))?;

        Ok(Self::from_gopath(&gopath).with_language(language))
    }

    /// Build the configuration from an explicit GOPATH value
    pub fn from_gopath(gopath: &str) -> Self {
        let root = shellexpand::tilde(gopath).into_owned();
        Self::new(PathBuf::from(root).join("src").join("github.com"))
    }

    /// Directory that holds every repository of `user`
    pub fn owner_directory(&self, user: &str) -> PathBuf {
        self.base_directory.join(user)
    }

    /// Local working tree location for `user/repo`
    pub fn repo_path(&self, user: &str, repo: &str) -> PathBuf {
        self.owner_directory(user).join(repo)
    }

    pub fn clone_url(&self, user: &str, repo: &str) -> String {
        format!(
            "{}/{}/{}.git",
            self.clone_base_url.trim_end_matches('/'),
            user,
            repo
        )
    }

    pub fn repos_url(&self, user: &str) -> String {
        format!(
            "{}/users/{}/repos",
            self.api_base_url.trim_end_matches('/'),
            user
        )
    }
}
