//! hostconf CLI - host-specific library resolution for C++ builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use hostconf::resolver::ConfigError;
use hostconf::util::diagnostic::{self, suggestions};
use hostconf::util::GlobalContext;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;
    let verbose = cli.verbose;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ConfigError>() {
            Some(config_error) => {
                let mut diag = config_error.to_diagnostic();
                if !verbose {
                    diag = diag.with_suggestion(suggestions::VERBOSE);
                }
                diagnostic::emit(&diag, color);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("hostconf=debug")
    } else {
        EnvFilter::new("hostconf=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut gctx = GlobalContext::from_root_arg(cli.root.as_deref())?;
    if let Some(machine) = cli.machine {
        gctx.config_mut().machine = Some(machine);
    }
    if let Some(dir) = cli.machines_dir {
        gctx.config_mut().machines_dir = Some(dir);
    }

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, &gctx),
        Commands::Flags(args) => commands::flags::execute(args, &gctx),
        Commands::Linkplan(args) => commands::linkplan::execute(args, &gctx),
        Commands::Machines(args) => commands::machines::execute(args, &gctx),
        Commands::CvodeVersion(args) => commands::cvode_version::execute(args, &gctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
