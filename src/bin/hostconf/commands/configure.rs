//! `hostconf configure` command

use anyhow::{Context, Result};

use crate::cli::ConfigureArgs;
use hostconf::ops::resolve_tools;
use hostconf::util::GlobalContext;

pub fn execute(args: ConfigureArgs, gctx: &GlobalContext) -> Result<()> {
    let (build, config) = super::resolve(gctx, &args.build)?;

    if args.json {
        let json = serde_json::to_string_pretty(&config)
            .context("failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Machine:  {}", config.machine);
    println!("Build:    {}", build);
    match config.petsc_version {
        Some(version) => println!("PETSc:    {}", version),
        None => println!("PETSc:    (not resolved)"),
    }

    println!();
    println!("Include paths:");
    for path in &config.params.include_paths {
        println!("  {}", path.display());
    }

    println!();
    println!("Library paths:");
    for path in &config.params.lib_paths {
        println!("  {}", path.display());
    }

    println!();
    println!("Libraries:");
    println!("  {}", config.params.libraries.join(" "));

    if !config.defines.is_empty() {
        println!();
        println!("Defines:");
        for define in &config.defines {
            println!("  {}", define);
        }
    }

    if !config.ccflags.is_empty() || !config.ldflags.is_empty() {
        println!();
        println!("ccflags:  {}", config.ccflags);
        println!("ldflags:  {}", config.ldflags);
    }

    println!();
    println!("Tools:");
    if args.tools {
        for tool in resolve_tools(&config.tools) {
            let found = match &tool.path {
                Some(path) => path.display().to_string(),
                None => "not found".to_string(),
            };
            println!("  {} = {}    # {}", tool.name, tool.command, found);
        }
    } else {
        for (name, command) in &config.tools {
            println!("  {} = {}", name, command);
        }
    }

    Ok(())
}
