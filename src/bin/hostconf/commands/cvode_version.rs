//! `hostconf cvode-version` command

use anyhow::Result;

use crate::cli::CvodeVersionArgs;
use hostconf::resolver::determine_cvode_version;
use hostconf::util::fs::absolutize;
use hostconf::util::GlobalContext;

pub fn execute(args: CvodeVersionArgs, gctx: &GlobalContext) -> Result<()> {
    let include = absolutize(gctx.root(), &args.include_path);
    let version = determine_cvode_version(&include)?;
    println!("{}", version);
    Ok(())
}
