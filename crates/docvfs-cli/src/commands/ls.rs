use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use docvfs_core::DirEntry;

use super::{Vfs, normalize_dir};
use crate::output::{
    EntryJson, create_table, display_name, format_entry_type, format_size, format_time,
};

#[derive(ClapArgs)]
pub struct Args {
    /// Directory path (default: root)
    #[arg(default_value = "/")]
    pub path: String,

    /// Show detailed information
    #[arg(short, long)]
    pub long: bool,

    /// Print entries as JSON
    #[arg(long, conflicts_with = "long")]
    pub json: bool,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let path = normalize_dir(&args.path);
    let entries = read_all(vfs, &path).with_context(|| format!("Cannot list {path}"))?;

    if args.json {
        let json: Vec<EntryJson<'_>> = entries.iter().map(EntryJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if args.long {
        print_long_format(&entries);
    } else {
        for entry in &entries {
            println!("{}", display_name(entry));
        }
    }
    Ok(())
}

/// Drain a directory through a handle session.
fn read_all(vfs: &Vfs, path: &str) -> Result<Vec<DirEntry>> {
    let handle = vfs.open_dir(path)?;
    let mut entries = Vec::new();
    let drained = loop {
        match vfs.read_next(handle) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => break Ok(entries),
            Err(e) => break Err(e),
        }
    };
    vfs.close_dir(handle);
    Ok(drained?)
}

fn print_long_format(entries: &[DirEntry]) {
    let mut table = create_table();
    table.set_header(vec!["Type", "Size", "Modified", "Name"]);

    for entry in entries {
        table.add_row(vec![
            format_entry_type(entry.is_dir()).to_string(),
            if entry.is_dir() {
                "-".to_string()
            } else {
                format_size(entry.size)
            },
            format_time(entry.modified),
            display_name(entry),
        ]);
    }

    println!("{table}");
}
