use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A file that only shows up at its destination once [`AtomicFile::commit`] succeeds.
///
/// Bytes go to a hidden temporary file next to the destination. Dropping the
/// value without committing removes the temporary file.
pub struct AtomicFile {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl AtomicFile {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();

        let tmp = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| Error::Write {
                path: path.clone(),
                source: e,
            })?;

        Ok(Self { tmp, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn staging_path(&self) -> &Path {
        self.tmp.path()
    }

    /// Flush to disk and move into place, replacing any existing file.
    pub fn commit(mut self) -> Result<PathBuf> {
        self.tmp.flush().map_err(|e| Error::Write {
            path: self.path.clone(),
            source: e,
        })?;
        self.tmp.as_file().sync_all().map_err(|e| Error::Write {
            path: self.path.clone(),
            source: e,
        })?;

        let path = self.path;
        self.tmp.persist(&path).map_err(|e| Error::Persist {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(path)
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tmp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.tmp.flush()
    }
}
