//! The `configure` operation: pick a machine, describe the build, resolve.

use anyhow::{Context, Result};

use crate::core::build::{BuildType, CompilerFamily};
use crate::machines::{HostInfo, Machine, MachineRegistry, Selection};
use crate::resolver::{configure, Configuration, ConfigureOptions};
use crate::util::GlobalContext;

/// How the user described the build.
///
/// Flags are added on top of the build string; they never switch a
/// modifier off.
#[derive(Debug, Clone, Default)]
pub struct ConfigureRequest {
    /// Build string such as `IntelProduction_hostconfig,petsc=3.0`
    pub build: Option<String>,
    pub compiler: Option<CompilerFamily>,
    pub optimised: bool,
    pub profile: bool,
    pub production: bool,
    pub dealii: bool,
    pub dealii_debugging: bool,
    pub debug: bool,
    /// `library=version` pairs
    pub prefer: Vec<(String, String)>,
    /// Machine identifier, overriding config and host detection
    pub machine: Option<String>,
}

/// Turn a request into a build type, falling back to the configured default.
pub fn build_type(gctx: &GlobalContext, request: &ConfigureRequest) -> Result<BuildType> {
    let mut build = match &request.build {
        Some(s) => s.parse::<BuildType>()?,
        None => match gctx.config().default_build() {
            Some(parsed) => parsed.context("invalid default build in config")?,
            None => BuildType::default(),
        },
    };

    if let Some(compiler) = request.compiler {
        build.compiler = compiler;
    }
    build.optimised |= request.optimised || request.production;
    build.profile |= request.profile;
    build.production |= request.production;
    build.using_dealii |= request.dealii || request.dealii_debugging;
    build.dealii_debugging |= request.dealii_debugging;
    build.debug |= request.debug;
    for (library, version) in &request.prefer {
        build.prefer(library.as_str(), version.as_str());
    }
    Ok(build)
}

/// Select the machine for this host.
pub fn select_machine(gctx: &GlobalContext, explicit: Option<&str>) -> Result<Machine> {
    let selection = Selection {
        explicit: explicit
            .map(str::to_string)
            .or_else(|| gctx.config().machine.clone()),
        machines_dir: Some(gctx.machines_dir()),
        host: HostInfo::detect(),
    };
    MachineRegistry::builtin().select(&selection)
}

/// Resolve the host configuration for a build.
///
/// Returns the final build alongside the configuration so callers can show
/// the tool commands it ended up with.
pub fn configure_host(
    gctx: &GlobalContext,
    request: &ConfigureRequest,
) -> Result<(BuildType, Configuration)> {
    let machine = select_machine(gctx, request.machine.as_deref())?;
    tracing::info!("using machine `{}` ({})", machine.id, machine.source);

    let mut build = build_type(gctx, request)?;
    let options = ConfigureOptions::from_env(gctx.root());
    let configuration = configure(machine, &mut build, &options)?;
    Ok((build, configuration))
}

/// Parse `library=version`.
pub fn parse_preference(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((lib, ver)) if !lib.is_empty() && !ver.is_empty() => {
            Ok((lib.to_string(), ver.to_string()))
        }
        _ => Err(format!("expected `library=version`, got `{}`", s)),
    }
}
