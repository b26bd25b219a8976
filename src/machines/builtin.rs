//! Built-in machine definitions.

use std::path::PathBuf;

use super::{HostTools, Machine};
use crate::core::build::PreferredVersions;
use crate::core::profile::{ConfigProfile, DEFAULT_PETSC_BUILD_NAME};
use crate::resolver::ConfigError;

/// Libraries every configuration links besides PETSc.
const COMMON_LIBRARIES: [&str; 4] = ["boost_serialization", "xerces-c", "hdf5", "z"];

/// Generic machine: PETSc from `PETSC_DIR` / `PETSC_ARCH`, everything else
/// from the system search paths.
pub fn default_machine() -> Machine {
    let mut profile = ConfigProfile::default();
    profile.petsc_path = std::env::var_os("PETSC_DIR")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    profile.petsc_build_name = std::env::var("PETSC_ARCH")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PETSC_BUILD_NAME.to_string());
    profile.other_libraries = COMMON_LIBRARIES.iter().map(|s| s.to_string()).collect();
    Machine::new("default", profile)
}

/// Ubuntu with the distribution's PETSc packages.
pub fn ubuntu_machine() -> Machine {
    let mut profile = packaged_profile();
    profile.petsc_3_0_path = Some(PathBuf::from("/usr/lib/petscdir/3.0.0"));
    profile.other_includepaths = vec![
        PathBuf::from("/usr/include/metis"),
        PathBuf::from("/usr/include/vtk-5.2"),
    ];
    Machine::new("ubuntu", profile).on_preferred_versions(packaged_versions_only)
}

/// Debian with the distribution's PETSc packages.
pub fn debian_machine() -> Machine {
    let mut profile = packaged_profile();
    profile.other_includepaths = vec![PathBuf::from("/usr/include/metis")];
    Machine::new("debian", profile).on_preferred_versions(packaged_versions_only)
}

fn packaged_profile() -> ConfigProfile {
    let mut profile = ConfigProfile::default();
    profile.petsc_2_3_path = Some(PathBuf::from("/usr/lib/petscdir/2.3.3"));
    profile.petsc_build_name = "linux-gnu-c-debug".to_string();
    profile.petsc_build_name_optimized = Some("linux-gnu-c-opt".to_string());
    profile.petsc_build_name_production = Some("linux-gnu-c-opt".to_string());
    profile.other_libraries = COMMON_LIBRARIES.iter().map(|s| s.to_string()).collect();
    profile.other_libraries.extend(["parmetis".to_string(), "metis".to_string()]);
    profile
        .tools
        .insert("xsd".to_string(), "/usr/bin/xsdcxx".to_string());
    profile
}

/// Distribution packages come in one version each; only PETSc can vary.
fn packaged_versions_only(
    prefs: &PreferredVersions,
    tools: &mut HostTools<'_>,
) -> Result<(), ConfigError> {
    let rejected: Vec<String> = prefs
        .iter()
        .filter(|(lib, _)| lib.as_str() != "petsc")
        .map(|(lib, ver)| format!("{}={}", lib, ver))
        .collect();
    if rejected.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        "packaged profile rooted at {} cannot switch {:?}",
        tools.root().display(),
        rejected
    );
    Err(ConfigError::UnsupportedPreferences {
        machine: "distribution packages".to_string(),
        preferences: rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_packaged_profiles() {
        let ubuntu = ubuntu_machine();
        assert_eq!(ubuntu.id, "ubuntu");
        assert!(ubuntu.profile.petsc_3_0_path.is_some());
        assert!(ubuntu.hooks.set_preferred_versions.is_some());

        let debian = debian_machine();
        assert!(debian.profile.petsc_3_0_path.is_none());
        assert_eq!(
            debian.profile.petsc_2_3_path,
            Some(PathBuf::from("/usr/lib/petscdir/2.3.3"))
        );
        assert!(debian.profile.other_libraries.contains(&"parmetis".to_string()));
    }

    #[test]
    fn test_packaged_versions_only_accepts_petsc() {
        let mut profile = ConfigProfile::default();
        let mut tools = HostTools::new(&mut profile, Path::new("/"));

        let mut prefs = PreferredVersions::new();
        prefs.insert("petsc".to_string(), "2.3".to_string());
        assert!(packaged_versions_only(&prefs, &mut tools).is_ok());

        prefs.insert("boost".to_string(), "1.40".to_string());
        let err = packaged_versions_only(&prefs, &mut tools).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedPreferences { ref preferences, .. } if preferences == &["boost=1.40"]
        ));
    }
}
