use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to move staged file into '{path}': {source}")]
    Persist { path: PathBuf, source: io::Error },
}

impl Error {
    /// The underlying I/O error, untouched.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Persist { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
