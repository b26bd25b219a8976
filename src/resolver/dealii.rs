//! Deal.II include and library resolution.
//!
//! Deal.II distinguishes optimised and debugging builds by library *name*
//! (a `.g` suffix) rather than by directory. It also needs PETSc headers:
//! releases before 6.0 link a full PETSc 2.2, 6.x only needs PETSc 2.3
//! headers because it ships its own `petscall` library.

use super::{petsc, ConfigError, ResolveContext};
use crate::core::build::BuildType;
use crate::core::version::BuildVariant;

const COMPONENT: &str = "Deal.II";

const INCLUDE_DIRS: [&str; 3] = ["base/include", "lac/include", "deal.II/include"];

const LIBRARIES: [&str; 5] = ["deal_II_1d", "deal_II_2d", "deal_II_3d", "lac", "base"];

/// Resolve Deal.II, and the PETSc it depends on, into the context.
pub fn resolve_dealii(ctx: &mut ResolveContext, build: &BuildType) -> Result<(), ConfigError> {
    let base = match ctx.profile.dealii_path.as_deref() {
        Some(path) => ctx.absolute(path),
        None => {
            return Err(ConfigError::NotConfigured {
                component: COMPONENT.to_string(),
            })
        }
    };
    ctx.check_path_exists(&base, COMPONENT)?;

    let version_file = base.join("Version");
    let version = std::fs::read_to_string(&version_file)
        .map_err(|source| ConfigError::Io {
            path: version_file.clone(),
            source,
        })?
        .trim()
        .to_string();
    let is_v6 = version.starts_with("6.");
    tracing::debug!("Deal.II version {} at {}", version, base.display());

    // PETSc first: Deal.II headers include PETSc headers. Only the
    // optimised flag picks the PETSc build; profile and production do not.
    let variant = BuildVariant::from_flags(build.optimised, false, false);
    if is_v6 {
        petsc::resolve_petsc(ctx, "2.3", variant, true)?;
    } else {
        petsc::resolve_petsc(ctx, "2.2", variant, false)?;
    }

    ctx.params.push_lib_path(base.join("lib"));
    for dir in INCLUDE_DIRS {
        ctx.params.push_include(base.join(dir));
    }

    let mut libs: Vec<String> = LIBRARIES.iter().map(|s| s.to_string()).collect();
    if is_v6 {
        libs.push("petscall".to_string());
    }
    if build.dealii_debugging {
        libs = libs.into_iter().map(|l| format!("{}.g", l)).collect();
    }
    ctx.params.extend_libraries(libs);

    Ok(())
}
