//! Stats command: run a scan and show what ended up in the cache.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use super::Vfs;
use crate::output::create_table;

#[derive(ClapArgs)]
pub struct Args {
    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(level = "info", name = "cmd::stats", skip_all)]
pub fn execute(vfs: &Vfs, args: &Args) -> Result<()> {
    let report = vfs.try_rebuild(true)?.unwrap_or_default();
    let stats = vfs.stats();

    if args.json {
        let value = json!({
            "cache": stats,
            "scan": {
                "directories": report.directories,
                "files": report.files,
                "unreadable": report.unreadable,
                "truncated": report.truncated,
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Directories".to_string(), stats.directories.to_string()]);
    table.add_row(vec!["Identifiers".to_string(), stats.identifiers.to_string()]);
    table.add_row(vec!["Entries".to_string(), stats.entries.to_string()]);
    table.add_row(vec!["Files scanned".to_string(), report.files.to_string()]);
    table.add_row(vec![
        "Unreadable directories".to_string(),
        report.unreadable.len().to_string(),
    ]);
    table.add_row(vec![
        "Directories at depth bound".to_string(),
        report.truncated.len().to_string(),
    ]);
    println!("{table}");

    for path in &report.unreadable {
        eprintln!("unreadable: {path}");
    }
    Ok(())
}
