//! Library resolution.
//!
//! Translates a machine profile plus a build description into concrete
//! include paths, library paths, link libraries and tool overrides.
//!
//! Resolution is a single linear pass: each library walks its fallback
//! chain best-first and takes the first candidate that exists on disk.
//! Everything is threaded through an explicit [`ResolveContext`]; there is
//! no global state.

pub mod configure;
pub mod cvode;
pub mod dealii;
pub mod errors;
pub mod overrides;
pub mod petsc;

use std::path::{Path, PathBuf};

use crate::core::accumulator::LinkParameters;
use crate::core::profile::ConfigProfile;
use crate::util::fs::absolutize;

pub use configure::{configure, optional_library_defines, ConfigureOptions, Configuration};
pub use cvode::{determine_cvode_version, parse_version_header};
pub use errors::ConfigError;
pub use overrides::{add_non_standard_location, Location};
pub use petsc::resolve_petsc;

/// Environment variable set when cross-compiling for Cray XT systems.
/// PETSc is supplied by the compiler wrappers there.
pub const CRAY_TARGET_ENV: &str = "XTPE_COMPILE_TARGET";

/// State threaded through one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Profile being resolved; hooks and overrides may still modify it
    pub profile: ConfigProfile,
    /// Accumulated compile/link parameters
    pub params: LinkParameters,
    /// Relative profile paths are interpreted against this directory
    pub root: PathBuf,
    /// Leave PETSc to the platform's compiler wrappers
    pub skip_petsc: bool,
}

impl ResolveContext {
    pub fn new(profile: ConfigProfile, root: impl Into<PathBuf>) -> Self {
        ResolveContext {
            profile,
            params: LinkParameters::new(),
            root: root.into(),
            skip_petsc: false,
        }
    }

    /// Resolve a profile path against the project root.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(&self.root, path)
    }

    /// Fail unless `path` exists.
    pub fn check_path_exists(&self, path: &Path, component: &str) -> Result<(), ConfigError> {
        check_path_exists(path, component)
    }
}

/// Fail with a configuration error naming `component` unless `path` exists.
pub fn check_path_exists(path: &Path, component: &str) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::path_not_found(component, path))
    }
}
