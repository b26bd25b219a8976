//! `hostconf flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use hostconf::util::GlobalContext;

pub fn execute(args: FlagsArgs, gctx: &GlobalContext) -> Result<()> {
    let (_, config) = super::resolve(gctx, &args.build)?;

    let show_compile = !args.link || args.compile;
    let show_link = !args.compile || args.link;

    if show_compile {
        println!("{}", config.compile_flags().join(" "));
    }
    if show_link {
        println!("{}", config.link_flags().join(" "));
    }

    Ok(())
}
