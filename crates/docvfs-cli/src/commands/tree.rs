use anyhow::Result;
use clap::Args as ClapArgs;

use super::{Vfs, normalize_dir};

#[derive(ClapArgs)]
pub struct Args {
    /// Starting path (default: root)
    #[arg(default_value = "/")]
    pub path: String,

    /// Maximum depth to display
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let path = normalize_dir(&args.path);
    // Fail early on an unknown start directory.
    vfs.read_dir(&path)?;

    let name = if path == "/" { "." } else { &args.path };
    println!("{name}");
    print_tree_recursive(vfs, &path, "", 0, args.max_depth)
}

fn print_tree_recursive(
    vfs: &Vfs,
    dir_path: &str,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
) -> Result<()> {
    if max_depth.is_some_and(|max| depth >= max) {
        return Ok(());
    }

    let entries = vfs.read_dir(dir_path)?;
    let total = entries.len();

    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };

        if entry.is_dir() {
            println!("{prefix}{connector}{}/", entry.name);
            let new_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            let child = format!("{dir_path}{}/", entry.name);
            print_tree_recursive(vfs, &child, &new_prefix, depth + 1, max_depth)?;
        } else {
            println!("{prefix}{connector}{}", entry.name);
        }
    }

    Ok(())
}
