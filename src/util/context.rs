//! Global context for hostconf operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::fs::absolutize;

/// Name of the per-project hostconf directory.
pub const PROJECT_DIR: &str = ".hostconf";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project root; relative machine paths resolve against it
    root: PathBuf,

    /// Merged global and project configuration
    config: Config,
}

impl GlobalContext {
    /// Create a context rooted at `root`, loading its configuration.
    pub fn with_root(root: PathBuf) -> Self {
        let global = global_config_path();
        let config = load_config(global.as_deref(), &project_config_path(&root));
        GlobalContext { root, config }
    }

    /// Create a context from an explicit root argument, relative to the cwd.
    pub fn from_root_arg(root: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(match root {
            Some(root) => Self::with_root(absolutize(&cwd, root)),
            None => Self::with_root(cwd),
        })
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Get the project-local hostconf directory.
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Directory searched for machine files.
    ///
    /// Defaults to `.hostconf/machines` under the project root.
    pub fn machines_dir(&self) -> PathBuf {
        match &self.config.machines_dir {
            Some(dir) => absolutize(&self.root, dir),
            None => self.project_dir().join("machines"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_root(tmp.path().to_path_buf()).with_config(Config::default());
        assert_eq!(ctx.project_dir(), tmp.path().join(".hostconf"));
        assert_eq!(ctx.machines_dir(), tmp.path().join(".hostconf/machines"));
    }

    #[test]
    fn test_machines_dir_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.machines_dir = Some(PathBuf::from("conf/machines"));

        let ctx = GlobalContext::with_root(tmp.path().to_path_buf()).with_config(config);
        assert_eq!(ctx.machines_dir(), tmp.path().join("conf/machines"));
    }

    #[test]
    fn test_project_config_loaded() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "machine = \"debian\"\n").unwrap();

        let ctx = GlobalContext::with_root(tmp.path().to_path_buf());
        assert_eq!(ctx.config().machine.as_deref(), Some("debian"));
    }
}
