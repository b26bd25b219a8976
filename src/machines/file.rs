//! TOML machine files.
//!
//! A machine file is a [`ConfigProfile`] written out as TOML, plus two
//! optional tables that become hooks:
//!
//! ```toml
//! description = "Lab cluster"
//! petsc_path = "/opt/petsc-3.1"
//! petsc_build_name = "linux-gnu-opt"
//! other_libraries = ["boost_serialization", "xerces-c", "hdf5", "z"]
//!
//! [features]
//! cvode = true
//!
//! # Libraries outside the system locations, applied before resolution
//! [locations]
//! boost = { path = "/opt/boost-1.40", version = "1.40" }
//! hdf5 = "/opt/hdf5-1.8"
//! cvode = "/opt/sundials-2.4"
//!
//! # Alternative installs selectable with `_hostconfig,boost=1.36`
//! [versions.boost]
//! "1.36" = "/opt/boost-1.36"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{HostTools, Machine, MachineSource};
use crate::core::build::PreferredVersions;
use crate::core::profile::{ConfigProfile, Feature};
use crate::resolver::{ConfigError, Location};
use crate::util::fs::read_to_string;

/// Extension of machine files.
pub const MACHINE_FILE_EXT: &str = "toml";

/// On-disk machine definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineFile {
    pub description: Option<String>,
    pub locations: Locations,
    /// library -> version -> install path
    pub versions: BTreeMap<String, BTreeMap<String, PathBuf>>,
    #[serde(flatten)]
    pub profile: ConfigProfile,
}

/// Boost needs its version to find the headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostLocation {
    pub path: PathBuf,
    pub version: String,
}

/// Non-standard install locations applied before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locations {
    pub boost: Option<BoostLocation>,
    pub hdf5: Option<PathBuf>,
    pub xerces: Option<PathBuf>,
    pub parmetis: Option<PathBuf>,
    pub xsd: Option<PathBuf>,
    /// SUNDIALS install prefix; also enables CVODE support
    pub cvode: Option<PathBuf>,
}

impl Locations {
    pub fn is_empty(&self) -> bool {
        *self == Locations::default()
    }

    /// Apply every configured location, in a fixed order.
    pub fn apply(&self, tools: &mut HostTools<'_>) -> Result<(), ConfigError> {
        if let Some(boost) = &self.boost {
            tools.add_boost(&boost.path, &boost.version)?;
        }
        if let Some(path) = &self.hdf5 {
            tools.add_hdf5(path)?;
        }
        if let Some(path) = &self.xerces {
            tools.add_xerces(path)?;
        }
        if let Some(path) = &self.parmetis {
            tools.add_parmetis(path)?;
        }
        if let Some(path) = &self.xsd {
            tools.add_xsd(path)?;
        }
        if let Some(path) = &self.cvode {
            add_cvode(tools, path)?;
        }
        Ok(())
    }
}

const CVODE_LIBRARIES: [&str; 2] = ["sundials_cvode", "sundials_nvecserial"];

fn add_cvode(tools: &mut HostTools<'_>, base: &Path) -> Result<(), ConfigError> {
    tools.check_path_exists(base, "CVODE")?;
    let base = crate::util::fs::absolutize(tools.root(), base);
    let include = base.join("include");
    tools.determine_cvode_version(&include)?;

    let profile = &mut *tools.profile;
    profile.other_includepaths.push(include);
    profile.other_libpaths.push(base.join("lib"));
    for lib in CVODE_LIBRARIES {
        if !profile.other_libraries.iter().any(|l| l == lib) {
            profile.other_libraries.push(lib.to_string());
        }
    }
    profile.set_feature(Feature::Cvode, true);
    Ok(())
}

impl MachineFile {
    /// Load a machine file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build a machine with this file's profile and hooks.
    pub fn into_machine(self, id: impl Into<String>, source: MachineSource) -> Machine {
        let id = id.into();
        let mut machine = Machine::new(id.clone(), self.profile).with_source(source);

        if !self.locations.is_empty() {
            let locations = self.locations;
            machine = machine.on_configure(move |_, _, tools| locations.apply(tools));
        }

        if !self.versions.is_empty() {
            let versions = self.versions;
            machine = machine
                .on_preferred_versions(move |prefs, tools| apply_versions(&id, &versions, prefs, tools));
        }

        machine
    }
}

/// Switch to the installs named by the preferred versions.
///
/// PETSc preferences are handled by the resolver and pass through.
fn apply_versions(
    machine: &str,
    versions: &BTreeMap<String, BTreeMap<String, PathBuf>>,
    prefs: &PreferredVersions,
    tools: &mut HostTools<'_>,
) -> Result<(), ConfigError> {
    let mut unsupported = Vec::new();
    for (library, version) in prefs {
        if library == "petsc" {
            continue;
        }
        let location = match library.as_str() {
            "boost" => Location::Boost {
                version: version.clone(),
            },
            "hdf5" => Location::Hdf5,
            "xerces" => Location::Xerces,
            "parmetis" => Location::ParMetis,
            "xsd" => Location::Xsd,
            _ => {
                unsupported.push(format!("{}={}", library, version));
                continue;
            }
        };
        match versions.get(library).and_then(|v| v.get(version)) {
            Some(path) => {
                tracing::debug!("using {} {} from {}", library, version, path.display());
                tools.add_location(&location, path)?;
            }
            None => unsupported.push(format!("{}={}", library, version)),
        }
    }

    if unsupported.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedPreferences {
            machine: machine.to_string(),
            preferences: unsupported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build::BuildType;
    use crate::resolver::{configure, ConfigureOptions};
    use crate::test_support::{write_sundials_header, PetscInstall};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_profile_fields() {
        let file = MachineFile::parse(
            r#"
description = "Lab cluster"
petsc_path = "/opt/petsc-3.1"
petsc_build_name = "linux-gnu-opt"
other_libraries = ["xerces-c"]
blas_lapack = ["f77blas", "lapack"]
ccflags = "-m64"

[features]
vtk = true

[tools]
mpicxx = "/opt/mpi/bin/mpicxx"
"#,
        )
        .unwrap();

        assert_eq!(file.description.as_deref(), Some("Lab cluster"));
        assert_eq!(file.profile.petsc_path, Some(PathBuf::from("/opt/petsc-3.1")));
        assert_eq!(file.profile.petsc_build_name, "linux-gnu-opt");
        assert_eq!(file.profile.other_libraries, vec!["xerces-c"]);
        assert_eq!(file.profile.blas_lapack, vec!["f77blas", "lapack"]);
        assert_eq!(file.profile.ccflags, "-m64");
        assert!(file.profile.uses(Feature::Vtk));
        assert_eq!(file.profile.tools["mpicxx"], "/opt/mpi/bin/mpicxx");
        assert!(file.locations.is_empty());
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let file = MachineFile::parse("").unwrap();
        assert_eq!(file.profile.petsc_build_name, "linux-gnu");
        assert_eq!(file.profile.blas_lapack, vec!["blas", "lapack"]);
    }

    #[test]
    fn test_locations_become_configure_hook() {
        let tmp = TempDir::new().unwrap();
        let petsc = PetscInstall::v3(tmp.path().join("petsc"), "linux-gnu").create();
        fs::create_dir_all(tmp.path().join("xerces")).unwrap();
        let sundials = tmp.path().join("sundials");
        write_sundials_header(&sundials.join("include"), "2.4.0");

        let content = format!(
            r#"
petsc_path = "{}"

[locations]
xerces = "xerces"
cvode = "sundials"
"#,
            petsc.display()
        );
        let machine = MachineFile::parse(&content)
            .unwrap()
            .into_machine("lab", MachineSource::Builtin);
        assert!(machine.hooks.configure.is_some());
        assert!(machine.hooks.set_preferred_versions.is_none());

        let mut build = BuildType::default();
        let config = configure(machine, &mut build, &ConfigureOptions::new(tmp.path())).unwrap();

        assert_eq!(
            config.params.libraries,
            vec![
                "petsc",
                "xerces-c",
                "sundials_cvode",
                "sundials_nvecserial",
                "blas",
                "lapack",
                "dl"
            ]
        );
        assert_eq!(
            config.defines,
            vec!["CHASTE_SUNDIALS_VERSION=20400", "CHASTE_CVODE"]
        );
        assert!(config
            .params
            .include_paths
            .contains(&sundials.join("include")));
    }

    #[test]
    fn test_versions_table_handles_preferences() {
        let tmp = TempDir::new().unwrap();
        let petsc = PetscInstall::v3(tmp.path().join("petsc"), "linux-gnu").create();
        fs::create_dir_all(tmp.path().join("hdf5-1.6")).unwrap();

        let content = format!(
            r#"
petsc_3_0_path = "{}"

[versions.hdf5]
"1.6" = "hdf5-1.6"
"#,
            petsc.display()
        );
        let machine = MachineFile::parse(&content)
            .unwrap()
            .into_machine("lab", MachineSource::Builtin);

        let mut build = BuildType::default();
        build.prefer("petsc", "3.0");
        build.prefer("hdf5", "1.6");
        let config = configure(machine, &mut build, &ConfigureOptions::new(tmp.path())).unwrap();

        assert_eq!(
            config.params.libraries,
            vec!["petscts", "petscsnes", "petscksp", "petscdm", "petscmat", "petscvec", "petsc", "hdf5", "z", "blas", "lapack", "dl"]
        );
    }

    #[test]
    fn test_versions_table_rejects_unknown_preference() {
        let tmp = TempDir::new().unwrap();
        let machine = MachineFile::parse("[versions.hdf5]\n\"1.6\" = \"/opt/hdf5\"\n")
            .unwrap()
            .into_machine("lab", MachineSource::Builtin);

        let mut build = BuildType::default();
        build.prefer("boost", "1.36");
        let err = configure(machine, &mut build, &ConfigureOptions::new(tmp.path())).unwrap_err();
        match err {
            ConfigError::UnsupportedPreferences { preferences, .. } => {
                assert_eq!(preferences, vec!["boost=1.36"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "petsc_path = [").unwrap();
        let err = MachineFile::load(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.toml"));
    }
}
