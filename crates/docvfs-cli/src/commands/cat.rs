use std::io;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use docvfs_core::OpenMode;

use super::{Vfs, normalize_path};

#[derive(ClapArgs)]
pub struct Args {
    /// File path
    pub file: String,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let path = normalize_path(&args.file);
    let mut file = vfs.open_file(&path, OpenMode::READ)?;
    io::copy(&mut file, &mut io::stdout().lock())
        .with_context(|| format!("Failed to read {path}"))?;
    Ok(())
}
