use anyhow::Result;
use clap::Args as ClapArgs;

use super::{Vfs, normalize_path};
use crate::output::{create_table, format_size, format_time};

#[derive(ClapArgs)]
pub struct Args {
    /// File or directory path (directories end with `/`)
    pub path: String,
}

pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let path = normalize_path(&args.path);
    let entry = vfs.entry(&path)?;
    let id = vfs.resolve(&path)?;

    let mut table = create_table();
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Path", path.as_str()]);
    table.add_row(vec!["Name", entry.name.as_str()]);
    table.add_row(vec![
        "Type",
        if entry.is_dir() { "directory" } else { "file" },
    ]);
    table.add_row(vec!["Size", &format_size(entry.size)]);
    table.add_row(vec!["Modified", &format_time(entry.modified)]);
    table.add_row(vec!["Node", id.as_str()]);
    println!("{table}");
    Ok(())
}
