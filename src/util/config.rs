//! Configuration file support for hostconf.
//!
//! hostconf supports two configuration file locations:
//! - Global: `~/.hostconf/config.toml` - User-wide defaults
//! - Project: `.hostconf/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! machine = "lab-cluster"
//! machines_dir = "machines"
//!
//! [build]
//! default = "GccOpt"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::build::{BuildType, BuildTypeParseError};

/// hostconf configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Machine identifier to use instead of detecting the host
    pub machine: Option<String>,

    /// Directory of TOML machine files
    pub machines_dir: Option<PathBuf>,

    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build string used when none is given on the command line
    pub default: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        // Relative machine directories are relative to the directory holding
        // `.hostconf/`, not to wherever hostconf happens to be run from.
        if let (Some(dir), Some(base)) = (&config.machines_dir, config_base(path)) {
            if dir.is_relative() {
                config.machines_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.machine.is_some() {
            self.machine = other.machine;
        }
        if other.machines_dir.is_some() {
            self.machines_dir = other.machines_dir;
        }
        if other.build.default.is_some() {
            self.build.default = other.build.default;
        }
    }

    /// Parse the default build string, if one is configured.
    pub fn default_build(&self) -> Option<Result<BuildType, BuildTypeParseError>> {
        self.build.default.as_deref().map(str::parse)
    }
}

/// `<dir>` for a config file at `<dir>/.hostconf/config.toml`.
fn config_base(path: &Path) -> Option<&Path> {
    path.parent()?.parent()
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.hostconf/config.toml)
/// 2. Global config (~/.hostconf/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global hostconf config directory (~/.hostconf).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".hostconf"))
}

/// Get the global config path (~/.hostconf/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.hostconf/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".hostconf").join("config.toml")
}
