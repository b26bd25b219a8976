//! PETSc include and library resolution.
//!
//! The on-disk layout differs between PETSc releases:
//!
//! | release | libraries                      | headers                          |
//! |---------|--------------------------------|----------------------------------|
//! | 2.2     | `lib/lib{O,g}_c++/<arch>`      | `bmake/<arch>`, `include`        |
//! | 2.3     | `lib/<arch>`                   | `bmake/<arch>`, `include`        |
//! | 3.x     | `<arch>/lib`                   | `<arch>/include`, `include`      |
//!
//! `<arch>` is the build name chosen for the requested variant.

use std::path::{Path, PathBuf};

use super::{ConfigError, ResolveContext};
use crate::core::version::{BuildVariant, PetscVersion};

const COMPONENT: &str = "PETSc";

/// Libraries linked for PETSc releases before 3.1.
const SPLIT_LIBRARIES: [&str; 7] = [
    "petscts",
    "petscsnes",
    "petscksp",
    "petscdm",
    "petscmat",
    "petscvec",
    "petsc",
];

/// Resolve PETSc into the context's accumulators.
///
/// Walks from `requested` down the release chain until an installed release
/// is found. With `includes_only` only header directories are added.
///
/// Returns the release that was used, or `None` when PETSc resolution is
/// disabled for this platform.
pub fn resolve_petsc(
    ctx: &mut ResolveContext,
    requested: &str,
    variant: BuildVariant,
    includes_only: bool,
) -> Result<Option<PetscVersion>, ConfigError> {
    if ctx.skip_petsc {
        tracing::info!("PETSc supplied by the platform, skipping");
        return Ok(None);
    }

    let requested_version: PetscVersion =
        requested.parse().map_err(|_| ConfigError::UnknownVersion {
            component: COMPONENT.to_string(),
            version: requested.to_string(),
        })?;

    let chain = requested_version.chain();
    let (version, base) = chain
        .select(|v| ctx.profile.petsc_install_path(*v).map(|p| ctx.absolute(p)))
        .ok_or_else(|| ConfigError::MissingDependency {
            component: COMPONENT.to_string(),
            requested: requested.to_string(),
            tried: chain.versions().iter().map(ToString::to_string).collect(),
        })?;

    if version != requested_version {
        tracing::info!(
            "PETSc {} not available, falling back to {}",
            requested_version,
            version
        );
    }
    tracing::debug!("using PETSc {} from {}", version, base.display());

    let lib_path = match version {
        PetscVersion::V2_2 => {
            let build_name = ctx.profile.petsc_build_name.clone();
            let optimised = matches!(variant, BuildVariant::Optimized | BuildVariant::Production);
            let dirs = if optimised {
                ["libO_c++", "libg_c++"]
            } else {
                ["libg_c++", "libO_c++"]
            };
            let lib_path = dirs
                .iter()
                .map(|d| base.join("lib").join(d).join(&build_name))
                .find(|p| p.exists())
                .ok_or_else(|| {
                    ConfigError::directory_not_found("PETSc 2.2", "libraries", base.join("lib"))
                })?;
            ctx.params.push_include(base.join("bmake").join(&build_name));
            lib_path
        }
        PetscVersion::V2_3 => {
            let names = ctx.profile.petsc_build_names(variant);
            let build_name = pick_build_name(&names, |name| base.join("lib").join(name));
            ctx.params.push_include(base.join("bmake").join(build_name));
            base.join("lib").join(build_name)
        }
        PetscVersion::V3_0 | PetscVersion::V3_1 => {
            let names = ctx.profile.petsc_build_names(variant);
            let build_name = pick_build_name(&names, |name| base.join(name).join("lib"));
            let arch_dir = base.join(build_name);
            ctx.params.push_include(arch_dir.join("include"));
            record_bundled_mpi(ctx, &arch_dir.join("bin"));
            arch_dir.join("lib")
        }
    };

    let include = base.join("include");
    if !include.is_dir() {
        return Err(ConfigError::directory_not_found(COMPONENT, "headers", include));
    }
    ctx.params.push_include(include);

    if !includes_only {
        if !lib_path.is_dir() {
            return Err(ConfigError::directory_not_found(
                COMPONENT,
                "libraries",
                lib_path,
            ));
        }
        ctx.params.push_lib_path(lib_path);
        if version == PetscVersion::V3_1 {
            ctx.params.push_library("petsc");
        } else {
            ctx.params.extend_libraries(SPLIT_LIBRARIES);
        }
    }

    Ok(Some(version))
}

/// First build name whose library directory exists.
///
/// When none exists the last candidate is returned so the caller reports a
/// missing library directory for it.
fn pick_build_name<'a, F>(names: &'a [String], lib_dir: F) -> &'a str
where
    F: Fn(&str) -> PathBuf,
{
    names
        .iter()
        .find(|name| lib_dir(name.as_str()).is_dir())
        .or_else(|| names.last())
        .map(String::as_str)
        .unwrap_or_default()
}

/// PETSc 3 can download and build its own MPI; prefer its wrappers if present.
fn record_bundled_mpi(ctx: &mut ResolveContext, bin: &Path) {
    for tool in ["mpicxx", "mpirun"] {
        let path = bin.join(tool);
        if path.exists() {
            tracing::debug!("using PETSc-bundled {}: {}", tool, path.display());
            ctx.profile
                .tools
                .insert(tool.to_string(), path.display().to_string());
        }
    }
}
