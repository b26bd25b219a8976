//! Ordered accumulators for compile and link parameters.
//!
//! The order of entries is significant: compilers and linkers search
//! include paths, library paths and libraries first-match, so an entry
//! appended earlier always takes precedence over one appended later.
//! Nothing in this module reorders or deduplicates entries on its own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Include paths, library paths and library names collected during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkParameters {
    /// Header search paths (-I)
    pub include_paths: Vec<PathBuf>,
    /// Library search paths (-L)
    pub lib_paths: Vec<PathBuf>,
    /// Libraries to link (-l)
    pub libraries: Vec<String>,
}

impl LinkParameters {
    /// Create empty accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header search path.
    pub fn push_include(&mut self, path: impl Into<PathBuf>) {
        self.include_paths.push(path.into());
    }

    /// Append a library search path.
    pub fn push_lib_path(&mut self, path: impl Into<PathBuf>) {
        self.lib_paths.push(path.into());
    }

    /// Append a library name.
    pub fn push_library(&mut self, name: impl Into<String>) {
        self.libraries.push(name.into());
    }

    /// Append several library names, keeping their relative order.
    pub fn extend_libraries<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libraries.extend(names.into_iter().map(Into::into));
    }

    /// Convert to compiler flags.
    pub fn compile_flags(&self) -> Vec<String> {
        self.include_paths
            .iter()
            .map(|p| format!("-I{}", p.display()))
            .collect()
    }

    /// Convert to linker flags, library paths first.
    pub fn link_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self
            .lib_paths
            .iter()
            .map(|p| format!("-L{}", p.display()))
            .collect();
        flags.extend(self.libraries.iter().map(|l| format!("-l{}", l)));
        flags
    }
}

/// Remove every path whose string form contains `needle`.
///
/// Used by location overrides to drop stale entries before re-adding.
pub fn remove_matching_paths(paths: &mut Vec<PathBuf>, needle: &str) {
    paths.retain(|p| !p.to_string_lossy().contains(needle));
}

/// Remove every library name starting with `prefix`.
pub fn remove_libraries_with_prefix(libraries: &mut Vec<String>, prefix: &str) {
    libraries.retain(|l| !l.starts_with(prefix));
}
