use std::path::Path;

use crate::{Error, Result};

/// Directory used for model checkpoints when the caller does not pick one.
pub const DEFAULT_CHECKPOINTS_DIR: &str = "checkpoints/";

/// Create `path` and any missing parents.
///
/// Returns `true` when something was created and `false` when the directory
/// was already there. Calling it repeatedly is harmless.
pub fn ensure_directory(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.is_dir() {
        tracing::trace!(path = %path.display(), "directory already exists");
        return Ok(false);
    }

    std::fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "created directory");
    Ok(true)
}

/// Ensure the checkpoints directory exists, defaulting to [`DEFAULT_CHECKPOINTS_DIR`].
pub fn ensure_checkpoints_dir(path: Option<&Path>) -> Result<bool> {
    ensure_directory(path.unwrap_or(Path::new(DEFAULT_CHECKPOINTS_DIR)))
}
