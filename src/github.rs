use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Host prefix users may paste in front of their login
const HOST_PREFIX: &str = "github.com/";

/// A repository as returned by the listing API
///
/// Only the fields the sync engine needs are kept; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDescriptor {
    /// `"<owner>/<repo>"`
    pub full_name: String,

    /// Primary language, `null` or absent for empty repositories
    #[serde(default)]
    pub language: Option<String>,
}

impl RepositoryDescriptor {
    pub fn new(full_name: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            full_name: full_name.into(),
            language: language.map(str::to_string),
        }
    }

    /// Bare repository name, the part of `full_name` after the first `/`
    ///
    /// The name must be a single path component: empty names, `.`, `..` and
    /// names containing a separator are rejected.
    pub fn repo_name(&self) -> Result<&str> {
        match self.full_name.split_once('/') {
            Some((_, name)) if is_path_component(name) => Ok(name),
            _ => Err(Error::MalformedDescriptor(self.full_name.clone())),
        }
    }

    /// Case-insensitive language comparison; a missing language never matches
    pub fn matches_language(&self, filter: &str) -> bool {
        self.language
            .as_deref()
            .map(|language| language.to_lowercase() == filter.to_lowercase())
            .unwrap_or(false)
    }
}

fn is_path_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Strip a leading `github.com/` from a user argument
pub fn normalize_user(user: &str) -> &str {
    user.strip_prefix(HOST_PREFIX).unwrap_or(user)
}

/// Thin client over the public repository listing endpoint
pub struct GitHubClient {
    client: reqwest::Client,
    config: Config,
}

impl GitHubClient {
    /// Create a new unauthenticated client
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Network {
                url: config.api_base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// List the public repositories of `user`, in API order
    ///
    /// Performs exactly one request. An empty list is a valid answer.
    pub async fn list_user_repositories(&self, user: &str) -> Result<Vec<RepositoryDescriptor>> {
        let url = self.config.repos_url(normalize_user(user));
        debug!("Fetching repository list: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Network {
            url: url.clone(),
            source,
        })?;

        let repositories: Vec<RepositoryDescriptor> = serde_json::from_slice(&body)?;

        info!("Found {} repositories for user {}", repositories.len(), user);
        Ok(repositories)
    }
}
