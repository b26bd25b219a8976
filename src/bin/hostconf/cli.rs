//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use hostconf::core::CompilerFamily;
use hostconf::ops::{parse_preference, ConfigureRequest};

/// hostconf - host-specific library resolution for C++ scientific builds
#[derive(Parser)]
#[command(name = "hostconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Machine configuration to use instead of detecting the host
    #[arg(long, global = true, env = "HOSTCONF_MACHINE")]
    pub machine: Option<String>,

    /// Directory of TOML machine files
    #[arg(long, global = true)]
    pub machines_dir: Option<PathBuf>,

    /// Project root; relative library paths are resolved against it
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and show the full host configuration
    Configure(ConfigureArgs),

    /// Show compile/link flags
    Flags(FlagsArgs),

    /// Show the link order and where each entry came from
    Linkplan(LinkplanArgs),

    /// List available machine configurations
    Machines(MachinesArgs),

    /// Print the CVODE version found under an include directory
    CvodeVersion(CvodeVersionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Description of the build being configured.
#[derive(Args, Clone, Default)]
pub struct BuildArgs {
    /// Build string, e.g. `GccOpt` or `IntelProduction_hostconfig,petsc=3.0`
    #[arg(short = 'b', long = "build-type")]
    pub build: Option<String>,

    /// Compiler family (gcc, intel)
    #[arg(long)]
    pub compiler: Option<CompilerFamily>,

    /// Optimised build
    #[arg(long)]
    pub opt: bool,

    /// Profiling build
    #[arg(long)]
    pub profile: bool,

    /// Production build (implies --opt)
    #[arg(long)]
    pub production: bool,

    /// Build against Deal.II
    #[arg(long)]
    pub dealii: bool,

    /// Link the debugging Deal.II libraries (implies --dealii)
    #[arg(long)]
    pub dealii_debug: bool,

    /// Log the complete resolution
    #[arg(long)]
    pub debug: bool,

    /// Preferred library version, e.g. `petsc=3.0` (repeatable)
    #[arg(long = "prefer", value_name = "LIB=VERSION", value_parser = parse_preference)]
    pub prefer: Vec<(String, String)>,
}

impl BuildArgs {
    pub fn to_request(&self) -> ConfigureRequest {
        ConfigureRequest {
            build: self.build.clone(),
            compiler: self.compiler,
            optimised: self.opt,
            profile: self.profile,
            production: self.production,
            dealii: self.dealii,
            dealii_debugging: self.dealii_debug,
            debug: self.debug,
            prefer: self.prefer.clone(),
            machine: None,
        }
    }
}

#[derive(Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also report where each tool command resolves on $PATH
    #[arg(long)]
    pub tools: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Show compile flags only
    #[arg(long)]
    pub compile: bool,

    /// Show link flags only
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct LinkplanArgs {
    #[command(flatten)]
    pub build: BuildArgs,
}

#[derive(Args)]
pub struct MachinesArgs {
    /// Show the selected machine's profile
    #[arg(long)]
    pub show: bool,
}

#[derive(Args)]
pub struct CvodeVersionArgs {
    /// Include directory containing `sundials/sundials_config.h`
    pub include_path: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
