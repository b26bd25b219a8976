//! `hostconf linkplan` command

use anyhow::Result;

use crate::cli::LinkplanArgs;
use hostconf::util::GlobalContext;

pub fn execute(args: LinkplanArgs, gctx: &GlobalContext) -> Result<()> {
    let (build, config) = super::resolve(gctx, &args.build)?;

    println!("Link order for {} on `{}`:", build, config.machine);
    println!();

    println!("Search paths:");
    for (index, path) in config.params.lib_paths.iter().enumerate() {
        println!("  {}. -L{}", index + 1, path.display());
    }
    println!();

    println!("Libraries:");
    for (index, lib) in config.params.libraries.iter().enumerate() {
        println!("  {}. -l{}", index + 1, lib);
    }

    if !config.ldflags.is_empty() {
        println!();
        println!("Extra linker flags: {}", config.ldflags);
    }

    Ok(())
}
