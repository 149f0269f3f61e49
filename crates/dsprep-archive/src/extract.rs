//! Two-pass extraction of gzip tar archives.
//!
//! The first pass walks every entry and validates its path (and link target)
//! against the destination, following the symlinks the archive itself
//! creates, without writing anything. Only when the whole
//! archive is clean is it opened again and unpacked.

use std::path::{Path, PathBuf};

use dsprep_fs::ensure_directory;
use tracing::{debug, info, warn};

use crate::entry::{Entry, EntryKind, ExtractProgress, ExtractReport};
use crate::error::{Error, Result};
use crate::links::PlannedLinks;
use crate::options::ExtractOptions;
use crate::sanitize::{self, is_descendant_path, normalize_path};

mod tar;

/// An entry that passed validation, with its link source resolved for hard links.
struct Planned {
    entry: Entry,
    link_source: Option<PathBuf>,
}

/// Extract `archive_path` (a `.tar.gz`) into `destination` with default options.
///
/// Fails with [`Error::PathTraversal`] before touching the destination if any
/// entry would land outside it.
pub fn extract_safely(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<ExtractReport> {
    extract_safely_with_options(archive_path, destination, &ExtractOptions::default())
}

pub fn extract_safely_with_options(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let archive_path = archive_path.as_ref();
    let destination = destination.as_ref();

    let archive_bytes = std::fs::metadata(archive_path)
        .map_err(|e| Error::Open {
            path: archive_path.to_path_buf(),
            source: e,
        })?
        .len();
    let root = sanitize::absolutize(destination)?;

    let plan = plan_entries(archive_path, &root, options)?;
    debug!(
        archive = %archive_path.display(),
        entries = plan.len(),
        "all entries stay inside destination"
    );

    ensure_directory(&root)?;
    let real_root = root.canonicalize().map_err(|e| Error::ExtractionFailed {
        path: root.clone(),
        source: e,
    })?;

    let mut archive = tar::open(archive_path, options)?;
    let mut entries = archive.entries().map_err(Error::Corrupted)?;

    let entries_total = plan.len();
    let mut written = Vec::with_capacity(entries_total);
    let mut total_bytes = 0u64;
    let mut skipped = 0usize;

    for (index, planned) in plan.into_iter().enumerate() {
        let expected = &planned.entry.original_path;
        let mut entry = match entries.next() {
            Some(entry) => entry.map_err(Error::Corrupted)?,
            None => {
                return Err(Error::ArchiveChanged {
                    expected: expected.clone(),
                    found: PathBuf::new(),
                });
            }
        };

        let found = tar::entry_path(&entry)?;
        if &found != expected {
            return Err(Error::ArchiveChanged {
                expected: expected.clone(),
                found,
            });
        }

        if unpack_entry(&mut entry, &planned, &real_root, options.overwrite)? {
            total_bytes += planned.entry.size;
            written.push(planned.entry);
        } else {
            skipped += 1;
        }

        options.report(&ExtractProgress {
            entries_done: index + 1,
            entries_total,
            bytes_processed: total_bytes,
            current: found,
        });
    }

    info!(
        archive = %archive_path.display(),
        destination = %root.display(),
        entries = written.len(),
        skipped,
        "extracted archive"
    );

    Ok(ExtractReport {
        archive_path: archive_path.to_path_buf(),
        archive_bytes,
        destination: root,
        entry_count: written.len(),
        total_bytes,
        skipped,
        entries: written,
    })
}

/// Enumerate every entry and check where it would land. Writes nothing.
///
/// Symlinks planned so far are followed when placing later entries, so an
/// archive that escapes through its own links fails here rather than half way
/// through unpacking.
fn plan_entries(archive_path: &Path, root: &Path, options: &ExtractOptions) -> Result<Vec<Planned>> {
    let mut archive = tar::open(archive_path, options)?;
    let mut plan = Vec::new();
    let mut links = PlannedLinks::default();

    for entry in archive.entries().map_err(Error::Corrupted)? {
        let entry = entry.map_err(Error::Corrupted)?;
        let original_path = tar::entry_path(&entry)?;
        let kind = tar::entry_kind(&entry)?;
        sanitize::resolve_entry_path(root, &original_path)?;

        // directories are created with mkdir -p, which follows a link in last position
        let follow_last = kind == EntryKind::Directory;
        let target_path = links.resolve(&root.join(&original_path), follow_last)?;
        ensure_planned_inside(root, &original_path, &target_path)?;

        if target_path == root && kind != EntryKind::Directory {
            return Err(Error::InvalidPath(format!(
                "non-directory entry '{}' resolves to the destination itself",
                original_path.display()
            )));
        }

        let link_source = match &kind {
            EntryKind::Symlink { target } => {
                links.insert(root, target_path.clone(), target, &original_path)?;
                None
            }
            EntryKind::Hardlink { target } => {
                let source = links.resolve(&root.join(target), false)?;
                ensure_planned_inside(root, &original_path, &source)?;
                // hard-linking a symlink yields another symlink with the same target
                match links.target_at(&source).map(Path::to_path_buf) {
                    Some(link_target) => {
                        links.insert(root, target_path.clone(), &link_target, &original_path)?;
                    }
                    None => links.remove(&target_path),
                }
                Some(source)
            }
            EntryKind::File => {
                links.remove(&target_path);
                None
            }
            EntryKind::Directory | EntryKind::Unsupported => None,
        };

        plan.push(Planned {
            entry: Entry {
                original_path,
                target_path,
                size: entry.size(),
                mode: entry.header().mode().ok(),
                kind,
            },
            link_source,
        });
    }

    links.check_all(root)?;
    Ok(plan)
}

fn ensure_planned_inside(root: &Path, entry: &Path, resolved: &Path) -> Result<()> {
    if is_descendant_path(root, resolved) {
        Ok(())
    } else {
        Err(Error::PathTraversal {
            entry: entry.to_path_buf(),
            resolved: resolved.to_path_buf(),
        })
    }
}

/// Write one validated entry. Returns `false` if the entry kind is skipped.
fn unpack_entry<R: std::io::Read>(
    entry: &mut ::tar::Entry<'_, R>,
    planned: &Planned,
    real_root: &Path,
    overwrite: bool,
) -> Result<bool> {
    let Entry {
        original_path,
        target_path,
        kind,
        ..
    } = &planned.entry;

    match kind {
        EntryKind::Unsupported => {
            warn!(
                entry = %original_path.display(),
                entry_type = ?entry.header().entry_type(),
                "skipping unsupported entry type"
            );
            return Ok(false);
        }
        EntryKind::Directory => {
            ensure_inside(real_root, target_path, original_path)?;
            ensure_directory(target_path)?;
            ensure_inside(real_root, target_path, original_path)?;
        }
        EntryKind::File => {
            prepare_parent(real_root, target_path, original_path)?;
            unpack_to(entry, target_path)?;
        }
        EntryKind::Symlink { target } => {
            prepare_parent(real_root, target_path, original_path)?;
            ensure_link_inside(real_root, target_path, target, original_path)?;
            unpack_to(entry, target_path)?;
        }
        EntryKind::Hardlink { .. } => {
            prepare_parent(real_root, target_path, original_path)?;
            let source = planned.link_source.as_deref().unwrap_or(target_path);
            ensure_inside(real_root, source, original_path)?;
            write_hardlink(source, target_path, overwrite)?;
        }
    }

    Ok(true)
}

fn unpack_to<R: std::io::Read>(entry: &mut ::tar::Entry<'_, R>, target: &Path) -> Result<()> {
    entry
        .unpack(target)
        .map(drop)
        .map_err(|e| Error::ExtractionFailed {
            path: target.to_path_buf(),
            source: e,
        })
}

fn prepare_parent(real_root: &Path, target: &Path, entry: &Path) -> Result<()> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };
    ensure_inside(real_root, parent, entry)?;
    ensure_directory(parent)?;
    // a symlink unpacked earlier may have redirected the freshly created parent
    ensure_inside(real_root, parent, entry)
}

/// Check that the nearest existing ancestor of `path`, with symlinks resolved,
/// is still inside `real_root`.
fn ensure_inside(real_root: &Path, path: &Path, entry: &Path) -> Result<()> {
    let Some(existing) = path.ancestors().find(|p| p.exists()) else {
        return Ok(());
    };
    let real = existing
        .canonicalize()
        .map_err(|e| Error::ExtractionFailed {
            path: existing.to_path_buf(),
            source: e,
        })?;

    if !is_descendant_path(real_root, &real) {
        return Err(Error::PathTraversal {
            entry: entry.to_path_buf(),
            resolved: real,
        });
    }
    Ok(())
}

/// Check a symlink about to be written at `location` against the directory it
/// really lands in.
fn ensure_link_inside(real_root: &Path, location: &Path, target: &Path, entry: &Path) -> Result<()> {
    let parent = location.parent().unwrap_or(real_root);
    let real_parent = parent
        .canonicalize()
        .map_err(|e| Error::ExtractionFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    let resolved = normalize_path(&real_parent.join(target));

    if !is_descendant_path(real_root, &resolved) {
        return Err(Error::PathTraversal {
            entry: entry.to_path_buf(),
            resolved,
        });
    }
    Ok(())
}

fn write_hardlink(source: &Path, link: &Path, replace: bool) -> Result<()> {
    if replace && link.symlink_metadata().is_ok() {
        std::fs::remove_file(link).map_err(|e| Error::ExtractionFailed {
            path: link.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::hard_link(source, link).map_err(|e| Error::ExtractionFailed {
        path: link.to_path_buf(),
        source: e,
    })
}
