//! Command implementations

pub mod completions;
pub mod configure;
pub mod cvode_version;
pub mod flags;
pub mod linkplan;
pub mod machines;

use anyhow::Result;

use crate::cli::BuildArgs;
use hostconf::core::BuildType;
use hostconf::ops::configure_host;
use hostconf::resolver::Configuration;
use hostconf::util::GlobalContext;

/// Resolve the configuration described by the shared build arguments.
pub(crate) fn resolve(gctx: &GlobalContext, args: &BuildArgs) -> Result<(BuildType, Configuration)> {
    configure_host(gctx, &args.to_request())
}
