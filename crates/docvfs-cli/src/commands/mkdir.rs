use anyhow::Result;
use clap::Args as ClapArgs;

use super::{Vfs, normalize_dir};

#[derive(ClapArgs)]
pub struct Args {
    /// Directory path to create
    pub path: String,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let path = normalize_dir(&args.path);
    let id = vfs.resolve_or_create(&path, true)?;
    tracing::info!(path = %path, id = %id, "Directory ready");
    Ok(())
}
