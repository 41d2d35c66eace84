//! In-memory index of a provider tree.
//!
//! A [`TreeCache`] maps canonical paths to provider identifiers and keeps an
//! ordered child list for every known directory. It is rebuilt wholesale by
//! the [`Scanner`](super::Scanner) and extended in place when this layer
//! creates directories or files.
//!
//! # Child lists
//!
//! Each directory's children live behind their own `Arc<RwLock<_>>`. Open
//! directory handles keep a clone of that `Arc`, so:
//! - appends made while a handle iterates are synchronized per directory
//! - a handle opened before a rebuild keeps iterating the old list until closed

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::Serialize;

use super::entry::DirEntry;
use super::path::ROOT;
use crate::provider::NodeId;

/// Shared, per-directory list of entries.
pub type EntryList = Arc<RwLock<Vec<DirEntry>>>;

/// Path-indexed cache of a provider tree.
#[derive(Debug)]
pub struct TreeCache {
    /// Canonical path -> provider identifier, for files and directories.
    identifiers: HashMap<String, NodeId>,
    /// Directory path -> ordered child entries.
    children: HashMap<String, EntryList>,
}

impl TreeCache {
    /// Create a cache holding only the root directory.
    pub fn new(root_id: NodeId) -> Self {
        let mut cache = Self {
            identifiers: HashMap::new(),
            children: HashMap::new(),
        };
        cache.insert_dir(ROOT, root_id);
        cache
    }

    /// Create a cache for a root that could not be resolved.
    ///
    /// The root lists as empty and has no identifier, so nothing can be
    /// created under it.
    pub fn unresolved() -> Self {
        let mut children = HashMap::new();
        children.insert(ROOT.to_string(), EntryList::default());
        Self {
            identifiers: HashMap::new(),
            children,
        }
    }

    /// Identifier recorded for `path`, if any.
    #[inline]
    pub fn identifier(&self, path: &str) -> Option<&NodeId> {
        self.identifiers.get(path)
    }

    /// The child list of directory `path`, if the directory is cached.
    #[inline]
    pub fn children(&self, path: &str) -> Option<EntryList> {
        self.children.get(path).cloned()
    }

    #[inline]
    pub fn contains_dir(&self, path: &str) -> bool {
        self.children.contains_key(path)
    }

    /// The root identifier.
    pub fn root_id(&self) -> Option<&NodeId> {
        self.identifier(ROOT)
    }

    /// Record a directory with an empty child list.
    ///
    /// An already cached directory keeps its existing list.
    pub fn insert_dir(&mut self, path: &str, id: NodeId) -> EntryList {
        self.identifiers.insert(path.to_string(), id);
        Arc::clone(
            self.children
                .entry(path.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(Vec::new()))),
        )
    }

    /// Record a file identifier. Files never get a child list.
    pub fn insert_file(&mut self, path: &str, id: NodeId) {
        self.identifiers.insert(path.to_string(), id);
    }

    /// Append an entry to the child list of `dir_path`.
    ///
    /// Returns false when the directory is not cached.
    pub fn push_entry(&self, dir_path: &str, entry: DirEntry) -> bool {
        match self.children.get(dir_path) {
            Some(list) => {
                list.write().push(entry);
                true
            }
            None => false,
        }
    }

    /// Look up one child of `dir_path` by name.
    pub fn find_entry(&self, dir_path: &str, name: &str) -> Option<DirEntry> {
        let list = self.children.get(dir_path)?;
        list.read().iter().find(|e| e.name == name).cloned()
    }

    /// Set the modification time of a cached child.
    ///
    /// Returns false when no such child is cached.
    pub fn touch_entry(&self, dir_path: &str, name: &str, modified: SystemTime) -> bool {
        let Some(list) = self.children.get(dir_path) else {
            return false;
        };
        let mut entries = list.write();
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Names of the root's children, in listing order.
    pub fn root_names(&self) -> Vec<String> {
        self.children
            .get(ROOT)
            .map(|list| list.read().iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Iterate over every cached directory path.
    pub fn directory_paths(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Get cache statistics for monitoring and debugging.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            directories: self.children.len(),
            identifiers: self.identifiers.len(),
            entries: self.children.values().map(|l| l.read().len()).sum(),
            open_handles: 0,
        }
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached directories (including the root)
    pub directories: usize,
    /// Number of cached path -> identifier mappings
    pub identifiers: usize,
    /// Total number of child entries over all directories
    pub entries: usize,
    /// Number of open directory handles
    pub open_handles: usize,
}
