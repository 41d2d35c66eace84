use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::Args as ClapArgs;
use docvfs_core::OpenMode;

use super::{Vfs, normalize_path};

#[derive(ClapArgs)]
pub struct Args {
    /// Destination file path
    pub path: String,

    /// Open mode: w, wt (create missing parents), wa (append), rw, rwt
    #[arg(short, long, default_value = "wt")]
    pub mode: OpenMode,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    if !args.mode.writes() {
        bail!("Mode '{}' does not write", args.mode);
    }
    let path = normalize_path(&args.path);

    // Read all content from stdin
    let mut content = Vec::new();
    io::stdin().read_to_end(&mut content)?;

    let mut file = vfs.open_file(&path, args.mode)?;
    file.write_all(&content)
        .with_context(|| format!("Failed to write {path}"))?;
    Ok(())
}
