//! Error types for dsprep-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// DNS, connection, HTTP status or body read failure. Never retried.
    #[error("failed to retrieve '{url}': {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] BoxError),

    #[error("destination '{0}' is a directory")]
    DestinationIsDirectory(PathBuf),

    #[error("failed to write '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] dsprep_fs::Error),
}

impl FetchError {
    pub fn network(url: &str, source: impl Into<BoxError>) -> Self {
        Self::Network {
            url: url.to_owned(),
            source: source.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
