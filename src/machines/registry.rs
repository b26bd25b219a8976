//! Machine registry and selection.
//!
//! Selection order:
//! 1. an explicitly requested identifier
//! 2. `<machines_dir>/<hostname>.toml`
//! 3. the distribution identifier, as a machine file or a built-in
//! 4. `default`
//!
//! Machine files shadow built-ins of the same name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::builtin::{debian_machine, default_machine, ubuntu_machine};
use super::file::{MachineFile, MACHINE_FILE_EXT};
use super::{HostInfo, Machine, MachineSource};

/// Identifier of the fallback machine.
pub const DEFAULT_MACHINE: &str = "default";

/// Constructor for a built-in machine.
pub type MachineConstructor = fn() -> Machine;

struct Entry {
    description: &'static str,
    build: MachineConstructor,
}

/// Maps machine identifiers to constructors.
pub struct MachineRegistry {
    entries: BTreeMap<String, Entry>,
}

/// Inputs to machine selection.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Identifier requested on the command line or in config
    pub explicit: Option<String>,
    /// Directory holding `<id>.toml` machine files
    pub machines_dir: Option<PathBuf>,
    pub host: HostInfo,
}

/// A machine available for selection, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSummary {
    pub id: String,
    pub description: String,
    pub source: MachineSource,
}

impl MachineRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        MachineRegistry {
            entries: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in machines.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            DEFAULT_MACHINE,
            "PETSc from $PETSC_DIR/$PETSC_ARCH, other libraries from system paths",
            default_machine,
        );
        registry.register("ubuntu", "Ubuntu distribution packages", ubuntu_machine);
        registry.register("debian", "Debian distribution packages", debian_machine);
        registry
    }

    pub fn register(&mut self, id: &str, description: &'static str, build: MachineConstructor) {
        self.entries
            .insert(id.to_string(), Entry { description, build });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Construct a built-in machine.
    pub fn get(&self, id: &str) -> Option<Machine> {
        self.entries.get(id).map(|entry| (entry.build)())
    }

    /// Construct a machine by identifier: a machine file first, then a built-in.
    pub fn lookup(&self, id: &str, machines_dir: Option<&Path>) -> Result<Option<Machine>> {
        if let Some(dir) = machines_dir {
            let path = machine_file_path(dir, id);
            if path.is_file() {
                tracing::debug!("loading machine file {}", path.display());
                let file = MachineFile::load(&path)?;
                return Ok(Some(file.into_machine(id, MachineSource::File(path))));
            }
        }
        Ok(self.get(id))
    }

    /// Pick the machine for this host.
    pub fn select(&self, selection: &Selection) -> Result<Machine> {
        let dir = selection.machines_dir.as_deref();

        if let Some(id) = &selection.explicit {
            if let Some(machine) = self.lookup(id, dir)? {
                return Ok(machine);
            }
            tracing::warn!(
                "unknown machine `{}`, using `{}` instead",
                id,
                DEFAULT_MACHINE
            );
            return self.fallback();
        }

        if let (Some(hostname), Some(dir)) = (&selection.host.hostname, dir) {
            let path = machine_file_path(dir, hostname);
            if path.is_file() {
                tracing::debug!("using machine file for host `{}`", hostname);
                let file = MachineFile::load(&path)?;
                return Ok(file.into_machine(hostname.as_str(), MachineSource::File(path)));
            }
        }

        if let Some(distro) = &selection.host.distro {
            if let Some(machine) = self.lookup(distro, dir)? {
                tracing::debug!("using configuration for distribution `{}`", distro);
                return Ok(machine);
            }
        }

        self.fallback()
    }

    fn fallback(&self) -> Result<Machine> {
        Ok(self.get(DEFAULT_MACHINE).unwrap_or_else(default_machine))
    }

    /// Built-in machines plus any machine files, sorted by identifier.
    pub fn list(&self, machines_dir: Option<&Path>) -> Result<Vec<MachineSummary>> {
        let mut summaries: BTreeMap<String, MachineSummary> = self
            .entries
            .iter()
            .map(|(id, entry)| {
                (
                    id.clone(),
                    MachineSummary {
                        id: id.clone(),
                        description: entry.description.to_string(),
                        source: MachineSource::Builtin,
                    },
                )
            })
            .collect();

        if let Some(dir) = machines_dir {
            for path in machine_files(dir)? {
                let Some(id) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                    continue;
                };
                let description = match MachineFile::load(&path) {
                    Ok(file) => file.description.unwrap_or_default(),
                    Err(e) => {
                        tracing::warn!("skipping {}: {:#}", path.display(), e);
                        continue;
                    }
                };
                summaries.insert(
                    id.clone(),
                    MachineSummary {
                        id,
                        description,
                        source: MachineSource::File(path),
                    },
                );
            }
        }

        Ok(summaries.into_values().collect())
    }
}

impl Default for MachineRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn machine_file_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.{}", id, MACHINE_FILE_EXT))
}

fn machine_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = dir.join(format!("*.{}", MACHINE_FILE_EXT));
    crate::util::fs::glob_paths(&pattern.display().to_string())
}
