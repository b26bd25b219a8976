//! Machine configurations.
//!
//! A machine bundles a [`ConfigProfile`] describing where libraries are
//! installed with optional hooks that adjust the profile or the build at
//! well-defined points during configuration.
//!
//! Machines come from three places:
//! - built-in constructors in the [`MachineRegistry`]
//! - TOML machine files (`<machines_dir>/<id>.toml`)
//! - the `default` fallback when nothing else matches

pub mod builtin;
pub mod file;
pub mod host;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::build::{BuildType, PreferredVersions};
use crate::core::profile::ConfigProfile;
use crate::resolver::{self, overrides, ConfigError, Location};
use crate::util::fs::absolutize;

pub use file::MachineFile;
pub use host::HostInfo;
pub use registry::{MachineRegistry, Selection};

/// Runs before anything is resolved. Receives the preferred versions and the build.
pub type ConfigureHook =
    Box<dyn Fn(&PreferredVersions, &BuildType, &mut HostTools<'_>) -> Result<(), ConfigError>>;

/// Applies preferred library versions to the profile.
pub type PreferencesHook =
    Box<dyn Fn(&PreferredVersions, &mut HostTools<'_>) -> Result<(), ConfigError>>;

/// Runs after resolution with the final tool map in place.
pub type ModifyBuildHook = Box<dyn Fn(&mut BuildType) -> Result<(), ConfigError>>;

/// Optional per-machine callbacks.
#[derive(Default)]
pub struct MachineHooks {
    pub configure: Option<ConfigureHook>,
    pub set_preferred_versions: Option<PreferencesHook>,
    pub modify_build: Option<ModifyBuildHook>,
}

impl MachineHooks {
    /// Whether the machine can act on preferred versions at all.
    pub fn handles_preferences(&self) -> bool {
        self.configure.is_some() || self.set_preferred_versions.is_some()
    }
}

impl fmt::Debug for MachineHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineHooks")
            .field("configure", &self.configure.is_some())
            .field("set_preferred_versions", &self.set_preferred_versions.is_some())
            .field("modify_build", &self.modify_build.is_some())
            .finish()
    }
}

/// Where a machine definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineSource {
    Builtin,
    File(PathBuf),
}

impl fmt::Display for MachineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineSource::Builtin => write!(f, "built-in"),
            MachineSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A fully constructed machine configuration.
#[derive(Debug)]
pub struct Machine {
    pub id: String,
    pub source: MachineSource,
    pub profile: ConfigProfile,
    pub hooks: MachineHooks,
}

impl Machine {
    pub fn new(id: impl Into<String>, profile: ConfigProfile) -> Self {
        Machine {
            id: id.into(),
            source: MachineSource::Builtin,
            profile,
            hooks: MachineHooks::default(),
        }
    }

    pub fn with_source(mut self, source: MachineSource) -> Self {
        self.source = source;
        self
    }

    pub fn on_configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PreferredVersions, &BuildType, &mut HostTools<'_>) -> Result<(), ConfigError>
            + 'static,
    {
        self.hooks.configure = Some(Box::new(hook));
        self
    }

    pub fn on_preferred_versions<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PreferredVersions, &mut HostTools<'_>) -> Result<(), ConfigError> + 'static,
    {
        self.hooks.set_preferred_versions = Some(Box::new(hook));
        self
    }

    pub fn on_modify_build<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut BuildType) -> Result<(), ConfigError> + 'static,
    {
        self.hooks.modify_build = Some(Box::new(hook));
        self
    }
}

// =============================================================================
// Host tools
// =============================================================================

/// Capabilities handed to machine hooks.
///
/// Hooks never touch resolver state directly; everything they may do to the
/// profile goes through here. Relative paths are taken relative to the
/// project root.
pub struct HostTools<'a> {
    pub profile: &'a mut ConfigProfile,
    root: &'a Path,
}

impl<'a> HostTools<'a> {
    pub fn new(profile: &'a mut ConfigProfile, root: &'a Path) -> Self {
        HostTools { profile, root }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(self.root, path)
    }

    pub fn check_path_exists(&self, path: &Path, component: &str) -> Result<(), ConfigError> {
        resolver::check_path_exists(&self.absolute(path), component)
    }

    pub fn add_boost(&mut self, base: &Path, version: &str) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_boost(self.profile, &base, version)
    }

    pub fn add_hdf5(&mut self, base: &Path) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_hdf5(self.profile, &base)
    }

    pub fn add_xerces(&mut self, base: &Path) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_xerces(self.profile, &base)
    }

    pub fn add_parmetis(&mut self, base: &Path) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_parmetis(self.profile, &base)
    }

    pub fn add_xsd(&mut self, base: &Path) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_xsd(self.profile, &base)
    }

    pub fn add_location(&mut self, location: &Location, base: &Path) -> Result<(), ConfigError> {
        let base = self.absolute(base);
        overrides::add_non_standard_location(self.profile, location, &base)
    }

    /// Detect the CVODE version under `include_path` and record it in the profile.
    pub fn determine_cvode_version(&mut self, include_path: &Path) -> Result<u32, ConfigError> {
        let version = resolver::determine_cvode_version(&self.absolute(include_path))?;
        self.profile.cvode_version = Some(version);
        Ok(version)
    }

    /// Delete files matching a glob, ignoring failures.
    pub fn try_remove(&self, pattern: &str) -> usize {
        let pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            self.root.join(pattern).display().to_string()
        };
        crate::util::fs::try_remove(&pattern)
    }
}
