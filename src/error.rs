//! Error types for gitcc.

use thiserror::Error;

/// Errors raised while listing or synchronizing repositories.
///
/// `Network`, `Status` and `Parse` come from the repository lister and abort
/// the whole run. The remaining kinds are local to a single repository or to
/// startup.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse repository list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed repository name {0:?}, expected \"owner/repo\"")]
    MalformedDescriptor(String),

    #[error("{0} environment variable is not set")]
    MissingBaseDirectory(&'static str),

    #[error("Failed to run git {args}: {source}")]
    GitSpawn {
        args: String,
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for gitcc operations.
pub type Result<T> = std::result::Result<T, Error>;
