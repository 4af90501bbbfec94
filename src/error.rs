//! Error types for repotree

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Any failure talking to the hosting API. The cause is kept as the
    /// source but not distinguished in the message.
    #[error("failed to fetch repository tree for {repo}")]
    Fetch {
        repo: String,
        #[source]
        source: FetchCause,
    },

    /// A saved listing given with `--input` is not a trees API response.
    #[error("could not decode tree listing: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not serialize tree: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("not a GitHub repository: '{0}' (expected owner/repo or a github.com URL)")]
    InvalidRepository(String),

    #[error("invalid YAML in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no repository given and none remembered from a previous run")]
    NoRepository,

    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What actually went wrong behind an [`Error::Fetch`].
#[derive(Error, Debug)]
pub enum FetchCause {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("invalid API base URL '{0}'")]
    BaseUrl(String),
}
