//! Tunables for the cached layer.

use serde::{Deserialize, Serialize};

/// Default number of directory levels below the root that a scan visits.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Size recorded for entries this layer creates before the provider
/// reports a real one.
pub const DEFAULT_SYNTHETIC_ENTRY_SIZE: u64 = 1;

/// Configuration for a [`CachedVfs`](crate::CachedVfs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    /// Depth bound of the scanner. Directories at this depth are cached but
    /// never listed.
    pub max_depth: usize,
    /// Emit per-file progress notifications while scanning.
    pub progress: bool,
    /// Size stored in synthetic entries for created files and directories.
    pub synthetic_entry_size: u64,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            progress: true,
            synthetic_entry_size: DEFAULT_SYNTHETIC_ENTRY_SIZE,
        }
    }
}

impl VfsConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Depth bound actually used by scans. The root is always listed.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.max(1)
    }
}
