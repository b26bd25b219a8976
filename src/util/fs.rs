//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Make `path` absolute by joining it onto `root` if it is relative, then
/// normalise `.` and `..` lexically. The path need not exist.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Sorted paths matching a glob pattern. Unreadable entries are skipped.
pub fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut results: Vec<PathBuf> = glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("glob error: {}", e);
                None
            }
        })
        .collect();
    results.sort();
    Ok(results)
}

/// Remove files matching a glob pattern, ignoring any failure.
///
/// Returns the number of files removed.
pub fn try_remove(pattern: &str) -> usize {
    let paths = match glob_paths(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!("not removing `{}`: {:#}", pattern, e);
            return 0;
        }
    };

    paths
        .iter()
        .filter(|path| match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("could not remove {}: {}", path.display(), e);
                false
            }
        })
        .count()
}
