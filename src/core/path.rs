//! Path helpers for root-relative paths
//!
//! Rule matching and manifest output both work on `/`-separated relative
//! paths regardless of the host separator.

use std::path::{Component, Path, PathBuf};

/// Split a relative path into its normal components.
///
/// `.` components are dropped; non-UTF-8 names are converted lossily.
pub fn relative_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Render a relative path with `/` separators, as written to a manifest
pub fn to_slash_string(path: &Path) -> String {
    relative_components(path).join("/")
}

/// Build a relative path from leading components
pub fn join_components<S: AsRef<str>>(components: &[S]) -> PathBuf {
    components.iter().map(|c| c.as_ref()).collect()
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the top of the path is dropped, so the result never climbs above
/// its first component.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                normalized.pop();
            },
            other => normalized.push(other),
        }
    }
    normalized
}
