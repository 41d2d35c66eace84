//! Directory handle table.
//!
//! An open directory is an iteration session: a reference to the child list
//! of one cached directory plus a cursor. Sessions are keyed by small
//! integer handles, much like file descriptors.
//!
//! # Handle Lifecycle
//!
//! 1. **Open**: bind a session to a directory's child list, cursor at 0
//! 2. **Next**: return the entry at the cursor and advance it
//! 3. **Close**: remove the session
//!
//! Sessions are independent. Two handles on the same directory iterate
//! separately, and a session outlives cache rebuilds because it holds its
//! own reference to the list it was opened on.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{VfsError, VfsResult};
use crate::tree::{DirEntry, EntryList};

/// Handle value that never names a session.
pub const INVALID_HANDLE: u64 = 0;

/// State of one open directory.
#[derive(Debug)]
pub struct DirSession {
    path: String,
    entries: EntryList,
    cursor: usize,
}

impl DirSession {
    pub fn new(path: impl Into<String>, entries: EntryList) -> Self {
        Self {
            path: path.into(),
            entries,
            cursor: 0,
        }
    }

    /// Directory path this session was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Return the entry at the cursor and advance, or `None` at the end.
    ///
    /// Once the end is reached every further call returns `None` as well.
    pub fn next_entry(&mut self) -> Option<DirEntry> {
        let entries = self.entries.read();
        let entry = entries.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(entry)
    }
}

/// Thread-safe table mapping handles to open directory sessions.
///
/// Handles are assigned incrementally and are unique for the lifetime of
/// the table. 0 is never issued.
#[derive(Debug)]
pub struct DirHandleTable {
    sessions: DashMap<u64, DirSession>,
    next_id: AtomicU64,
}

impl Default for DirHandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DirHandleTable {
    /// Create a new empty handle table. Handle IDs start at 1.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Open a session over `entries` and return its handle.
    pub fn open(&self, path: &str, entries: EntryList) -> u64 {
        let mut session = Some(DirSession::new(path, entries));
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if id == INVALID_HANDLE {
                continue;
            }
            if let Entry::Vacant(slot) = self.sessions.entry(id) {
                if let Some(session) = session.take() {
                    slot.insert(session);
                }
                return id;
            }
        }
    }

    /// Advance the session behind `handle`.
    pub fn next(&self, handle: u64) -> VfsResult<Option<DirEntry>> {
        let mut session = self
            .sessions
            .get_mut(&handle)
            .ok_or(VfsError::InvalidHandle(handle))?;
        Ok(session.next_entry())
    }

    /// Close a session. Returns whether it existed.
    pub fn close(&self, handle: u64) -> bool {
        self.sessions.remove(&handle).is_some()
    }

    /// Directory path behind an open handle.
    pub fn path_of(&self, handle: u64) -> Option<String> {
        self.sessions.get(&handle).map(|s| s.path().to_string())
    }

    /// Get the number of open handles.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
