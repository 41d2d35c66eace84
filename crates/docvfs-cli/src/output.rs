use std::time::SystemTime;

use chrono::{DateTime, Local};
use comfy_table::Table;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use docvfs_core::DirEntry;
use serde::Serialize;

/// Create a styled table for output
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);
    table
}

/// Format a byte size into a human-readable string
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.1}G", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1}M", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1}K", b as f64 / KB as f64),
        b => format!("{b}B"),
    }
}

/// Format an entry type indicator
pub fn format_entry_type(is_dir: bool) -> &'static str {
    if is_dir { "d" } else { "-" }
}

/// Format a modification time in local time
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Display name of an entry; directories get a trailing `/`
pub fn display_name(entry: &DirEntry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}

/// JSON shape of a directory entry
#[derive(Debug, Serialize)]
pub struct EntryJson<'a> {
    pub name: &'a str,
    pub kind: docvfs_core::NodeKind,
    pub size: u64,
    /// Milliseconds since the Unix epoch
    pub modified: u64,
}

impl<'a> From<&'a DirEntry> for EntryJson<'a> {
    fn from(entry: &'a DirEntry) -> Self {
        Self {
            name: &entry.name,
            kind: entry.kind,
            size: entry.size,
            modified: entry.modified_millis(),
        }
    }
}
