//! Final configuration pass.
//!
//! Runs the machine hooks and library resolution in a fixed order and
//! collects the result into a [`Configuration`]. Order matters throughout:
//! libraries that depend on others must precede them on the link line, so
//! PETSc comes before `other_libraries`, which come before BLAS/LAPACK, with
//! `dl` always last.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::{check_path_exists, dealii, petsc, ConfigError, ResolveContext, CRAY_TARGET_ENV};
use crate::core::accumulator::LinkParameters;
use crate::core::build::{BuildType, CompilerFamily};
use crate::core::profile::{ConfigProfile, Feature, DEFAULT_CVODE_VERSION};
use crate::core::version::PetscVersion;
use crate::machines::{HostTools, Machine};

/// PETSc release used when the build expresses no preference.
pub const DEFAULT_PETSC_VERSION: &str = "3.1";

const INTEL_COMPONENT: &str = "Intel compilers";

/// Settings for one configuration pass that do not come from the machine.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Project root; relative profile paths are resolved against it
    pub root: PathBuf,
    /// Leave PETSc to the platform's compiler wrappers
    pub skip_petsc: bool,
}

impl ConfigureOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ConfigureOptions {
            root: root.into(),
            skip_petsc: false,
        }
    }

    /// Options for `root`, skipping PETSc when cross-compiling for Cray XT.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let skip_petsc = std::env::var(CRAY_TARGET_ENV)
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        if skip_petsc {
            tracing::info!("{} is set; PETSc comes from the compiler wrappers", CRAY_TARGET_ENV);
        }
        ConfigureOptions {
            root: root.into(),
            skip_petsc,
        }
    }
}

/// The resolved host configuration for one build.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    pub machine: String,
    pub build: String,
    pub petsc_version: Option<PetscVersion>,
    #[serde(flatten)]
    pub params: LinkParameters,
    pub tools: BTreeMap<String, String>,
    pub defines: Vec<String>,
    pub ccflags: String,
    pub ldflags: String,
}

impl Configuration {
    /// Compiler arguments: defines, include paths, then `ccflags`.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self.defines.iter().map(|d| format!("-D{}", d)).collect();
        flags.extend(self.params.compile_flags());
        flags.extend(self.ccflags.split_whitespace().map(str::to_string));
        flags
    }

    /// Linker arguments: library paths, libraries, then `ldflags`.
    pub fn link_flags(&self) -> Vec<String> {
        let mut flags = self.params.link_flags();
        flags.extend(self.ldflags.split_whitespace().map(str::to_string));
        flags
    }
}

/// Preprocessor defines for the optional libraries the profile enables.
///
/// The SUNDIALS version define precedes `CHASTE_CVODE` so that headers
/// testing the version see it first.
pub fn optional_library_defines(profile: &ConfigProfile) -> Vec<String> {
    let mut defines = Vec::new();
    if profile.uses(Feature::Cvode) {
        defines.push(format!(
            "CHASTE_SUNDIALS_VERSION={}",
            profile.cvode_version.unwrap_or(DEFAULT_CVODE_VERSION)
        ));
    }
    defines.extend(
        profile
            .enabled_features()
            .into_iter()
            .map(|f| f.define().to_string()),
    );
    defines
}

/// Configure `build` for `machine`.
///
/// The machine's profile is consumed; the build's tool map is updated in
/// place so callers can inspect the final commands.
pub fn configure(
    machine: Machine,
    build: &mut BuildType,
    options: &ConfigureOptions,
) -> Result<Configuration, ConfigError> {
    let Machine {
        id, profile, hooks, ..
    } = machine;
    tracing::debug!("configuring {} for machine `{}`", build, id);

    let mut ctx = ResolveContext::new(profile, options.root.clone());
    ctx.skip_petsc = options.skip_petsc;

    let prefs = build.preferred_versions.clone();

    if let Some(hook) = &hooks.configure {
        let mut tools = HostTools::new(&mut ctx.profile, &ctx.root);
        hook(&prefs, build, &mut tools)?;
    }

    let petsc_version = if build.using_dealii {
        dealii::resolve_dealii(&mut ctx, build)?;
        let other = ctx.profile.other_libraries.clone();
        ctx.params.extend_libraries(other);
        // Deal.II ships its own BLAS/LAPACK
        ctx.params.extend_libraries(["blas", "lapack"]);
        None
    } else {
        if !prefs.is_empty() {
            if let Some(hook) = &hooks.set_preferred_versions {
                let mut tools = HostTools::new(&mut ctx.profile, &ctx.root);
                hook(&prefs, &mut tools)?;
            } else if !hooks.handles_preferences() {
                return Err(ConfigError::UnsupportedPreferences {
                    machine: id,
                    preferences: prefs.iter().map(|(k, v)| format!("{}={}", k, v)).collect(),
                });
            }
        }
        let requested: String = prefs
            .get("petsc")
            .map(|v| v.chars().take(3).collect())
            .unwrap_or_else(|| DEFAULT_PETSC_VERSION.to_string());

        let version = petsc::resolve_petsc(&mut ctx, &requested, build.variant(), false)?;

        // Some of other_libraries may depend on BLAS/LAPACK.
        let other = ctx.profile.other_libraries.clone();
        ctx.params.extend_libraries(other);
        let blas = ctx.profile.blas_lapack_for(build.production).to_vec();
        ctx.params.extend_libraries(blas);
        version
    };

    let intel_path = if build.compiler == CompilerFamily::Intel {
        let path = intel_install(&ctx)?;
        let lib = path.join("lib");
        check_path_exists(&lib, INTEL_COMPONENT)?;
        ctx.params.push_lib_path(lib);
        Some(path)
    } else {
        None
    };

    for path in &ctx.profile.other_includepaths {
        ctx.params.include_paths.push(path.clone());
    }
    let libpaths: Vec<PathBuf> = ctx
        .profile
        .other_libpaths
        .iter()
        .map(|p| ctx.absolute(p))
        .collect();
    ctx.params.lib_paths.extend(libpaths);

    // Dynamically loaded models need libdl.
    ctx.params.push_library("dl");

    build
        .tools
        .extend(ctx.profile.tools.iter().map(|(k, v)| (k.clone(), v.clone())));

    if let Some(intel) = intel_path {
        if let Some(icpc) = &ctx.profile.icpc {
            let mpicxx = build.tools.entry("mpicxx".to_string()).or_default();
            mpicxx.push_str(&format!(" -CC=\"{}\"", icpc));
        }
        let bin = intel.join("bin");
        check_path_exists(&bin, INTEL_COMPONENT)?;
        build
            .tools
            .insert("cxx".to_string(), bin.join("icpc").display().to_string());
        build
            .tools
            .insert("ar".to_string(), bin.join("xiar").display().to_string());
    }

    if let Some(hook) = &hooks.modify_build {
        hook(build)?;
    }

    let config = Configuration {
        machine: id,
        build: build.to_string(),
        petsc_version,
        defines: optional_library_defines(&ctx.profile),
        ccflags: ctx.profile.ccflags.clone(),
        ldflags: ctx.profile.ldflags.clone(),
        tools: build.tools.clone(),
        params: ctx.params,
    };

    if build.debug {
        dump_debug_info(&config, &ctx.profile);
        build.dump_debug_info();
    }

    Ok(config)
}

fn intel_install(ctx: &ResolveContext) -> Result<PathBuf, ConfigError> {
    let path = ctx
        .profile
        .intel_path
        .as_deref()
        .map(|p| ctx.absolute(p))
        .ok_or_else(|| ConfigError::NotConfigured {
            component: INTEL_COMPONENT.to_string(),
        })?;
    check_path_exists(&path, INTEL_COMPONENT)?;
    Ok(path)
}

fn dump_debug_info(config: &Configuration, profile: &ConfigProfile) {
    tracing::debug!("using host configuration `{}`", config.machine);
    match toml::to_string(profile) {
        Ok(text) => {
            for line in text.lines().filter(|l| !l.is_empty()) {
                tracing::debug!("  {}", line);
            }
        }
        Err(e) => tracing::debug!("profile could not be rendered: {}", e),
    }
    tracing::debug!("libraries: {:?}", config.params.libraries);
    tracing::debug!("library paths: {:?}", display_paths(&config.params.lib_paths));
    tracing::debug!("include paths: {:?}", display_paths(&config.params.include_paths));
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}
