use std::io;
use std::path::PathBuf;

use crate::format::ArchiveFormat;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("unsupported archive format for '{path}' (detected: {detected:?}); expected a gzip-compressed tar")]
    UnsupportedFormat {
        path: PathBuf,
        detected: Option<ArchiveFormat>,
    },

    #[error("attempted path traversal: entry '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: PathBuf, resolved: PathBuf },

    #[error("invalid entry path in archive: {0}")]
    InvalidPath(String),

    #[error("archive is corrupted: {0}")]
    Corrupted(#[source] io::Error),

    #[error("archive changed while extracting: expected '{expected}', found '{found}'")]
    ArchiveChanged { expected: PathBuf, found: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] dsprep_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn is_path_traversal(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
