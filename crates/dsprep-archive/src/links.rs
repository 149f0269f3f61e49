//! Symlinks an archive lays out, tracked while planning.
//!
//! An entry name is only meaningful once the symlinks written before it are
//! taken into account: after `d/l -> ..` the name `d/l/x` lands at `x`. The
//! planner records every symlink by the location it will occupy and resolves
//! later names (and link targets) through them the way the kernel would.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::sanitize::is_descendant_path;

/// Matches Linux `MAXSYMLINKS`.
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
struct PlannedLink {
    /// Target as stored in the archive, relative to the link's directory.
    target: PathBuf,
    entry: PathBuf,
}

#[derive(Debug, Default)]
pub(crate) struct PlannedLinks {
    links: BTreeMap<PathBuf, PlannedLink>,
}

enum Step {
    Prefix(OsString),
    Root(OsString),
    Parent,
    Normal(OsString),
}

fn push_steps(pending: &mut Vec<Step>, path: &Path) {
    let steps: Vec<Step> = path
        .components()
        .filter_map(|c| match c {
            Component::Prefix(p) => Some(Step::Prefix(p.as_os_str().to_owned())),
            Component::RootDir => Some(Step::Root(c.as_os_str().to_owned())),
            Component::ParentDir => Some(Step::Parent),
            Component::Normal(part) => Some(Step::Normal(part.to_owned())),
            Component::CurDir => None,
        })
        .collect();
    // popped from the back, so the first component goes last
    pending.extend(steps.into_iter().rev());
}

impl PlannedLinks {
    /// Where the absolute `path` lands once planned symlinks are followed.
    ///
    /// `..` applies to the location reached so far, not to the spelling of
    /// the name. The last component is followed only with `follow_last`.
    pub(crate) fn resolve(&self, path: &Path, follow_last: bool) -> Result<PathBuf> {
        let mut current = PathBuf::new();
        let mut pending = Vec::new();
        push_steps(&mut pending, path);
        let mut hops = 0;

        while let Some(step) = pending.pop() {
            match step {
                Step::Prefix(prefix) => current = PathBuf::from(prefix),
                Step::Root(root) => current.push(root),
                Step::Parent => {
                    current.pop();
                }
                Step::Normal(part) => {
                    current.push(part);
                    if pending.is_empty() && !follow_last {
                        continue;
                    }
                    let Some(link) = self.links.get(&current) else {
                        continue;
                    };
                    hops += 1;
                    if hops > MAX_LINK_HOPS {
                        return Err(Error::InvalidPath(format!(
                            "too many levels of symbolic links resolving '{}'",
                            path.display()
                        )));
                    }
                    let target = link.target.clone();
                    current.pop();
                    push_steps(&mut pending, &target);
                }
            }
        }

        Ok(current)
    }

    /// Record a symlink at `location` and check where it points now.
    pub(crate) fn insert(
        &mut self,
        root: &Path,
        location: PathBuf,
        target: &Path,
        entry: &Path,
    ) -> Result<PathBuf> {
        if target.has_root() {
            return Err(Error::PathTraversal {
                entry: entry.to_path_buf(),
                resolved: target.to_path_buf(),
            });
        }
        self.links.insert(
            location.clone(),
            PlannedLink {
                target: target.to_path_buf(),
                entry: entry.to_path_buf(),
            },
        );
        self.check(root, &location, entry)
    }

    /// A plain file or hard link replaces whatever link sat at `location`.
    pub(crate) fn remove(&mut self, location: &Path) {
        self.links.remove(location);
    }

    /// Raw target of the link planned at `location`, if any.
    pub(crate) fn target_at(&self, location: &Path) -> Option<&Path> {
        self.links.get(location).map(|link| link.target.as_path())
    }

    /// Re-check every link against the final layout. A link placed later can
    /// redirect a component an earlier target walks through.
    pub(crate) fn check_all(&self, root: &Path) -> Result<()> {
        for (location, link) in &self.links {
            self.check(root, location, &link.entry)?;
        }
        Ok(())
    }

    fn check(&self, root: &Path, location: &Path, entry: &Path) -> Result<PathBuf> {
        let resolved = self.resolve(location, true)?;
        if !is_descendant_path(root, &resolved) {
            return Err(Error::PathTraversal {
                entry: entry.to_path_buf(),
                resolved,
            });
        }
        Ok(resolved)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const ROOT: &str = "/opt/dataset";

    fn root() -> &'static Path {
        Path::new(ROOT)
    }

    #[test]
    fn plain_paths_resolve_unchanged() {
        let links = PlannedLinks::default();
        let path = root().join("data/a.txt");
        assert_eq!(links.resolve(&path, true).unwrap(), path);
    }

    #[test]
    fn earlier_link_redirects_later_names() {
        let mut links = PlannedLinks::default();
        links
            .insert(root(), root().join("d/l"), Path::new(".."), Path::new("d/l"))
            .unwrap();

        assert_eq!(
            links.resolve(&root().join("d/l/x.txt"), false).unwrap(),
            root().join("x.txt")
        );
        // the link itself is not followed unless asked
        assert_eq!(
            links.resolve(&root().join("d/l"), false).unwrap(),
            root().join("d/l")
        );
    }

    #[test]
    fn parent_applies_after_following() {
        let mut links = PlannedLinks::default();
        links
            .insert(root(), root().join("a"), Path::new("x/y"), Path::new("a"))
            .unwrap();
        assert_eq!(
            links.resolve(&root().join("a/../z"), false).unwrap(),
            root().join("x/z")
        );
    }

    #[test]
    fn link_escaping_through_earlier_link_is_rejected() {
        let mut links = PlannedLinks::default();
        let first = links
            .insert(root(), root().join("d/l"), Path::new(".."), Path::new("d/l"))
            .unwrap();
        assert_eq!(first, root());

        let location = links.resolve(&root().join("d/l/l"), false).unwrap();
        assert_eq!(location, root().join("l"));
        let err = links
            .insert(root(), location, Path::new(".."), Path::new("d/l/l"))
            .unwrap_err();
        match err {
            Error::PathTraversal { entry, resolved } => {
                assert_eq!(entry, Path::new("d/l/l"));
                assert_eq!(resolved, Path::new("/opt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn later_link_can_break_earlier_target() {
        let mut links = PlannedLinks::default();
        // s/a -> l/../.. is the root while l is a directory
        links
            .insert(root(), root().join("s/a"), Path::new("l/../.."), Path::new("s/a"))
            .unwrap();
        // s/l -> ../x is fine on its own but pulls s/a above the root
        links
            .insert(root(), root().join("s/l"), Path::new("../x"), Path::new("s/l"))
            .unwrap();

        assert!(matches!(
            links.check_all(root()),
            Err(Error::PathTraversal { .. })
        ));
    }

    #[test]
    fn absolute_target_is_rejected() {
        let mut links = PlannedLinks::default();
        let result = links.insert(
            root(),
            root().join("bin/tool"),
            Path::new("/etc/passwd"),
            Path::new("bin/tool"),
        );
        assert!(matches!(result, Err(Error::PathTraversal { .. })));
    }

    #[test]
    fn removed_link_no_longer_redirects() {
        let mut links = PlannedLinks::default();
        links
            .insert(root(), root().join("d"), Path::new("e"), Path::new("d"))
            .unwrap();
        links.remove(&root().join("d"));
        assert_eq!(
            links.resolve(&root().join("d/x"), false).unwrap(),
            root().join("d/x")
        );
        assert!(links.target_at(&root().join("d")).is_none());
    }

    #[test]
    fn link_cycle_is_invalid() {
        let mut links = PlannedLinks::default();
        links
            .insert(root(), root().join("a"), Path::new("b"), Path::new("a"))
            .unwrap();
        let result = links.insert(root(), root().join("b"), Path::new("a"), Path::new("b"));
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }
}
