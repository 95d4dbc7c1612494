//! Lexical path helpers for the resolver.
//!
//! The resolver performs no filesystem I/O; path comparisons and joins are
//! purely lexical. Existence and symlink aliasing are the engine's concern.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` pops a previously pushed normal component; leading `..` components
/// that cannot be popped are kept. An input that collapses to nothing yields
/// `.` so the result always names a directory.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }

    out.iter().collect()
}

/// Join an entry-point path onto the root directory.
///
/// A leading `/` marks the path as root-relative (`/home.js` under root
/// `src` is `src/home.js`), matching the config-file convention. The result
/// is normalized.
#[must_use]
pub fn join_root(root: &Path, entry: &str) -> PathBuf {
    let relative = entry.strip_prefix('/').unwrap_or(entry);
    normalize(&root.join(relative))
}
