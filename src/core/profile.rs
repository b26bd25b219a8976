//! Configuration profile - where a machine keeps its libraries and tools.
//!
//! A profile is created once per invocation (from a built-in machine or a
//! TOML machine file), progressively filled in by machine hooks and location
//! overrides, and finally consumed by the resolver.
//!
//! Library paths are optional: `None` means the library is not installed.
//! Relative paths are interpreted relative to the project root.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::version::{BuildVariant, PetscVersion};

/// Default PETSc architecture name when a machine does not set one.
pub const DEFAULT_PETSC_BUILD_NAME: &str = "linux-gnu";

/// CVODE version assumed when none was detected (2.3.0).
pub const DEFAULT_CVODE_VERSION: u32 = 20300;

/// Mutable per-build host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigProfile {
    /// PETSc 2.2 install
    pub petsc_2_2_path: Option<PathBuf>,
    /// PETSc 2.3 install
    pub petsc_2_3_path: Option<PathBuf>,
    /// PETSc 3.0 install
    pub petsc_3_0_path: Option<PathBuf>,
    /// PETSc 3.1 install
    pub petsc_path: Option<PathBuf>,

    /// PETSc architecture used when no variant-specific name applies
    pub petsc_build_name: String,
    pub petsc_build_name_optimized: Option<String>,
    pub petsc_build_name_profile: Option<String>,
    pub petsc_build_name_production: Option<String>,

    /// Deal.II install
    pub dealii_path: Option<PathBuf>,
    /// Intel compiler install
    pub intel_path: Option<PathBuf>,
    /// Replacement Intel compiler command, e.g. with 64-bit flags
    pub icpc: Option<String>,

    /// Optional libraries (`cvode`, `vtk`, `adaptivity`)
    pub features: BTreeMap<String, bool>,
    /// Packed CVODE version (major*10000 + minor*100 + patch)
    pub cvode_version: Option<u32>,

    pub other_includepaths: Vec<PathBuf>,
    pub other_libpaths: Vec<PathBuf>,
    pub other_libraries: Vec<String>,

    /// BLAS and LAPACK library names
    pub blas_lapack: Vec<String>,
    /// BLAS and LAPACK for production builds; falls back to `blas_lapack`
    pub blas_lapack_production: Option<Vec<String>>,

    /// Executables not found on $PATH
    pub tools: BTreeMap<String, String>,

    pub ccflags: String,
    pub ldflags: String,

    /// Base path of the last non-standard location applied per library
    #[serde(skip)]
    pub override_bases: BTreeMap<String, PathBuf>,
}

impl Default for ConfigProfile {
    fn default() -> Self {
        ConfigProfile {
            petsc_2_2_path: None,
            petsc_2_3_path: None,
            petsc_3_0_path: None,
            petsc_path: None,
            petsc_build_name: DEFAULT_PETSC_BUILD_NAME.to_string(),
            petsc_build_name_optimized: None,
            petsc_build_name_profile: None,
            petsc_build_name_production: None,
            dealii_path: None,
            intel_path: None,
            icpc: None,
            features: BTreeMap::new(),
            cvode_version: None,
            other_includepaths: Vec::new(),
            other_libpaths: Vec::new(),
            other_libraries: Vec::new(),
            blas_lapack: vec!["blas".to_string(), "lapack".to_string()],
            blas_lapack_production: None,
            tools: BTreeMap::new(),
            ccflags: String::new(),
            ldflags: String::new(),
            override_bases: BTreeMap::new(),
        }
    }
}

impl ConfigProfile {
    /// Install path configured for a PETSc release.
    pub fn petsc_install_path(&self, version: PetscVersion) -> Option<&Path> {
        match version {
            PetscVersion::V2_2 => self.petsc_2_2_path.as_deref(),
            PetscVersion::V2_3 => self.petsc_2_3_path.as_deref(),
            PetscVersion::V3_0 => self.petsc_3_0_path.as_deref(),
            PetscVersion::V3_1 => self.petsc_path.as_deref(),
        }
    }

    /// Candidate PETSc build names for a variant, best first.
    ///
    /// The variant's own name comes first (falling back to the default name
    /// when unset), then the default name, then the optimised name since some
    /// installations only ship an optimised build.
    pub fn petsc_build_names(&self, variant: BuildVariant) -> Vec<String> {
        let default = &self.petsc_build_name;
        let optimized = self.petsc_build_name_optimized.as_ref().unwrap_or(default);

        let mut names = Vec::with_capacity(3);
        match variant {
            BuildVariant::Production => names.push(
                self.petsc_build_name_production
                    .as_ref()
                    .unwrap_or(default)
                    .clone(),
            ),
            BuildVariant::Profile => names.push(
                self.petsc_build_name_profile
                    .as_ref()
                    .unwrap_or(default)
                    .clone(),
            ),
            BuildVariant::Optimized => names.push(optimized.clone()),
            BuildVariant::Debug => {}
        }
        names.push(default.clone());
        names.push(optimized.clone());
        names
    }

    /// Whether an optional library is switched on.
    pub fn uses(&self, feature: Feature) -> bool {
        self.features.get(feature.key()).copied().unwrap_or(false)
    }

    /// Switch an optional library on or off.
    pub fn set_feature(&mut self, feature: Feature, enabled: bool) {
        self.features.insert(feature.key().to_string(), enabled);
    }

    /// Enabled optional libraries in declaration order.
    ///
    /// Names that are not recognised are logged and skipped.
    pub fn enabled_features(&self) -> Vec<Feature> {
        for (name, enabled) in &self.features {
            if *enabled && name.parse::<Feature>().is_err() {
                tracing::warn!("ignoring unknown optional library `{}`", name);
            }
        }
        Feature::ALL
            .into_iter()
            .filter(|f| self.uses(*f))
            .collect()
    }

    /// BLAS/LAPACK names for the build.
    pub fn blas_lapack_for(&self, production: bool) -> &[String] {
        match (&self.blas_lapack_production, production) {
            (Some(libs), true) => libs,
            _ => &self.blas_lapack,
        }
    }
}

/// Optional third-party libraries that toggle preprocessor defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Cvode,
    Vtk,
    Adaptivity,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Cvode, Feature::Vtk, Feature::Adaptivity];

    /// Key in the `[features]` table.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Cvode => "cvode",
            Feature::Vtk => "vtk",
            Feature::Adaptivity => "adaptivity",
        }
    }

    /// Preprocessor symbol defined when the library is used.
    pub fn define(&self) -> &'static str {
        match self {
            Feature::Cvode => "CHASTE_CVODE",
            Feature::Vtk => "CHASTE_VTK",
            Feature::Adaptivity => "CHASTE_ADAPTIVITY",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cvode" => Ok(Feature::Cvode),
            "vtk" => Ok(Feature::Vtk),
            "adaptivity" => Ok(Feature::Adaptivity),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = ConfigProfile::default();
        assert_eq!(profile.petsc_build_name, "linux-gnu");
        assert!(profile.petsc_path.is_none());
        assert_eq!(profile.blas_lapack, vec!["blas", "lapack"]);
        assert!(profile.enabled_features().is_empty());
    }

    #[test]
    fn test_build_names_fallback() {
        let mut profile = ConfigProfile::default();
        profile.petsc_build_name = "linux-gnu".to_string();
        profile.petsc_build_name_optimized = Some("linux-gnu-opt".to_string());

        assert_eq!(
            profile.petsc_build_names(BuildVariant::Profile),
            vec!["linux-gnu", "linux-gnu", "linux-gnu-opt"]
        );
        assert_eq!(
            profile.petsc_build_names(BuildVariant::Optimized),
            vec!["linux-gnu-opt", "linux-gnu", "linux-gnu-opt"]
        );
        assert_eq!(
            profile.petsc_build_names(BuildVariant::Debug),
            vec!["linux-gnu", "linux-gnu-opt"]
        );

        profile.petsc_build_name_production = Some("linux-intel-prod".to_string());
        assert_eq!(
            profile.petsc_build_names(BuildVariant::Production)[0],
            "linux-intel-prod"
        );
    }

    #[test]
    fn test_features() {
        let mut profile = ConfigProfile::default();
        profile.set_feature(Feature::Vtk, true);
        profile.set_feature(Feature::Cvode, true);
        profile.features.insert("magic".to_string(), true);

        assert!(profile.uses(Feature::Vtk));
        assert!(!profile.uses(Feature::Adaptivity));
        assert_eq!(profile.enabled_features(), vec![Feature::Cvode, Feature::Vtk]);
    }

    #[test]
    fn test_blas_lapack_production_fallback() {
        let mut profile = ConfigProfile::default();
        assert_eq!(profile.blas_lapack_for(true), ["blas", "lapack"]);

        profile.blas_lapack_production = Some(vec!["mkl_lapack".to_string()]);
        assert_eq!(profile.blas_lapack_for(true), ["mkl_lapack"]);
        assert_eq!(profile.blas_lapack_for(false), ["blas", "lapack"]);
    }

    #[test]
    fn test_profile_from_toml() {
        let profile: ConfigProfile = toml::from_str(
            r#"
petsc_path = "/opt/petsc-3.1"
petsc_build_name = "linux-gnu-c-debug"
other_libraries = ["boost_serialization", "xerces-c"]
ccflags = "-Wno-deprecated"

[features]
vtk = true

[tools]
xsd = "/opt/xsd/bin/xsd"
"#,
        )
        .unwrap();

        assert_eq!(profile.petsc_path, Some(PathBuf::from("/opt/petsc-3.1")));
        assert_eq!(profile.petsc_build_name, "linux-gnu-c-debug");
        assert_eq!(profile.other_libraries, vec!["boost_serialization", "xerces-c"]);
        assert!(profile.uses(Feature::Vtk));
        assert_eq!(profile.tools.get("xsd").map(String::as_str), Some("/opt/xsd/bin/xsd"));
        assert_eq!(profile.blas_lapack, vec!["blas", "lapack"]);
    }
}
