use std::time::{SystemTime, UNIX_EPOCH};

use crate::provider::{ChildRow, NodeKind};

/// One child of a cached directory, as seen at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
    pub kind: NodeKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, size: u64, modified: SystemTime, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            size,
            modified,
            kind,
        }
    }

    /// Entry recorded for a node this layer created itself.
    pub fn synthetic(name: impl Into<String>, kind: NodeKind, size: u64) -> Self {
        Self::new(name, size, SystemTime::now(), kind)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Modification time in milliseconds since the Unix epoch.
    pub fn modified_millis(&self) -> u64 {
        self.modified
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<&ChildRow> for DirEntry {
    fn from(row: &ChildRow) -> Self {
        Self::new(row.name.clone(), row.size, row.modified, row.kind)
    }
}
