use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Whether `candidate` lies inside `root` (or is `root` itself).
///
/// Both sides are made absolute against the current directory and lexically
/// normalized before comparing, and the comparison walks path components, so
/// `/a/b` is not considered an ancestor of `/a/bb`. Returns `false` if either
/// path cannot be made absolute.
pub fn is_descendant_path(root: impl AsRef<Path>, candidate: impl AsRef<Path>) -> bool {
    match (absolutize(root.as_ref()), absolutize(candidate.as_ref())) {
        (Ok(root), Ok(candidate)) => candidate.starts_with(&root),
        _ => false,
    }
}

/// Absolute, lexically normalized form of `path`. Symlinks are not resolved.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize_path(&std::path::absolute(path)?))
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

/// Where an entry named `entry` lands under the absolute, normalized `root`.
pub fn resolve_entry_path(root: &Path, entry: &Path) -> Result<PathBuf> {
    let resolved = normalize_path(&root.join(entry));
    if !is_descendant_path(root, &resolved) {
        return Err(Error::PathTraversal {
            entry: entry.to_path_buf(),
            resolved,
        });
    }
    Ok(resolved)
}
