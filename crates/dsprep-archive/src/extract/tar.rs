use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::entry::EntryKind;
use crate::error::{Error, Result};
use crate::format::{self, ArchiveFormat};
use crate::options::ExtractOptions;

pub(crate) type GzTar = tar::Archive<GzDecoder<BufReader<File>>>;

/// Open a gzip tar for reading, refusing anything whose magic bytes say otherwise.
pub(crate) fn open(path: &Path, options: &ExtractOptions) -> Result<GzTar> {
    let open_err = |e| Error::Open {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = BufReader::new(File::open(path).map_err(open_err)?);
    let detected = format::detect_from_reader(&mut reader).map_err(open_err)?;
    if !detected.is_some_and(ArchiveFormat::is_supported) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            detected,
        });
    }

    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.set_overwrite(options.overwrite);
    archive.set_preserve_permissions(options.preserve_permissions);
    archive.set_preserve_mtime(true);
    Ok(archive)
}

/// The raw, unsanitized name recorded in the archive.
pub(crate) fn entry_path<R: Read>(entry: &tar::Entry<'_, R>) -> Result<PathBuf> {
    entry
        .path()
        .map(Cow::into_owned)
        .map_err(|e| Error::InvalidPath(e.to_string()))
}

pub(crate) fn entry_kind<R: Read>(entry: &tar::Entry<'_, R>) -> Result<EntryKind> {
    let entry_type = entry.header().entry_type();

    let kind = if entry_type.is_dir() {
        EntryKind::Directory
    } else if entry_type.is_symlink() {
        EntryKind::Symlink {
            target: link_target(entry)?,
        }
    } else if entry_type.is_hard_link() {
        EntryKind::Hardlink {
            target: link_target(entry)?,
        }
    } else if entry_type.is_file() || entry_type.is_contiguous() {
        EntryKind::File
    } else {
        EntryKind::Unsupported
    };
    Ok(kind)
}

fn link_target<R: Read>(entry: &tar::Entry<'_, R>) -> Result<PathBuf> {
    match entry.link_name() {
        Ok(Some(target)) => Ok(target.into_owned()),
        Ok(None) => Err(Error::InvalidPath(format!(
            "link entry '{}' has no target",
            String::from_utf8_lossy(&entry.path_bytes())
        ))),
        Err(e) => Err(Error::InvalidPath(e.to_string())),
    }
}
