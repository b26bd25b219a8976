//! `hostconf machines` command

use anyhow::{Context, Result};

use crate::cli::MachinesArgs;
use hostconf::ops::{format_listing, list_machines, select_machine};
use hostconf::util::GlobalContext;

pub fn execute(args: MachinesArgs, gctx: &GlobalContext) -> Result<()> {
    let listing = list_machines(gctx)?;

    println!(
        "Host: {} ({})",
        listing.host.hostname.as_deref().unwrap_or("unknown"),
        listing.host.distro.as_deref().unwrap_or("unknown distribution")
    );
    println!("Machine files: {}", gctx.machines_dir().display());
    println!();
    print!("{}", format_listing(&listing));

    if args.show {
        let machine = select_machine(gctx, None)?;
        let profile =
            toml::to_string_pretty(&machine.profile).context("failed to render profile")?;
        println!();
        println!("# Profile for `{}`", machine.id);
        print!("{}", profile);
    }

    Ok(())
}
