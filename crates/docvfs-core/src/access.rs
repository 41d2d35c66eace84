//! Opening files by canonical path.
//!
//! Write modes create the leaf file when it is not cached yet. The `t`
//! (truncate) modes additionally create any missing parent directories.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::str::FromStr;
use std::time::SystemTime;

use tracing::{debug, instrument, warn};

use crate::error::{VfsError, VfsResult};
use crate::provider::{NodeId, NodeKind, StorageProvider};
use crate::resolver::Resolver;
use crate::tree::path;
use crate::tree::{DirEntry, TreeCache};

/// Access mode for [`CachedVfs::open_file`](crate::CachedVfs::open_file).
///
/// Parsed from the compact mode strings `r`, `w`, `wt`, `wa`, `rw` and `rwt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode {
    read: bool,
    write: bool,
    truncate: bool,
    append: bool,
}

impl OpenMode {
    pub const READ: Self = Self::new(true, false, false, false);
    pub const WRITE: Self = Self::new(false, true, false, false);
    pub const WRITE_TRUNCATE: Self = Self::new(false, true, true, false);
    pub const WRITE_APPEND: Self = Self::new(false, true, false, true);
    pub const READ_WRITE: Self = Self::new(true, true, false, false);
    pub const READ_WRITE_TRUNCATE: Self = Self::new(true, true, true, false);

    const fn new(read: bool, write: bool, truncate: bool, append: bool) -> Self {
        Self {
            read,
            write,
            truncate,
            append,
        }
    }

    #[inline]
    pub fn reads(self) -> bool {
        self.read
    }

    #[inline]
    pub fn writes(self) -> bool {
        self.write
    }

    /// Whether missing parent directories may be created.
    #[inline]
    pub fn creates_parents(self) -> bool {
        self.write && self.truncate
    }

    pub fn as_str(self) -> &'static str {
        match (self.read, self.write, self.truncate, self.append) {
            (true, false, _, _) => "r",
            (false, true, true, _) => "wt",
            (false, true, _, true) => "wa",
            (false, true, false, false) => "w",
            (true, true, true, _) => "rwt",
            _ => "rw",
        }
    }

    /// Host `OpenOptions` equivalent, for providers backed by files.
    pub fn to_open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.read)
            .write(self.write && !self.append)
            .append(self.append)
            .truncate(self.truncate);
        options
    }
}

impl FromStr for OpenMode {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Self::READ),
            "w" => Ok(Self::WRITE),
            "wt" => Ok(Self::WRITE_TRUNCATE),
            "wa" => Ok(Self::WRITE_APPEND),
            "rw" => Ok(Self::READ_WRITE),
            "rwt" => Ok(Self::READ_WRITE_TRUNCATE),
            other => Err(VfsError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens files through the provider, creating them on demand.
pub struct FileAccess<'a> {
    provider: &'a dyn StorageProvider,
    synthetic_size: u64,
}

impl<'a> FileAccess<'a> {
    pub fn new(provider: &'a dyn StorageProvider, synthetic_size: u64) -> Self {
        Self {
            provider,
            synthetic_size,
        }
    }

    /// Open an already cached file. Never mutates the cache.
    #[instrument(level = "debug", skip(self, cache), fields(mode = %mode))]
    pub fn open_existing(&self, cache: &TreeCache, path: &str, mode: OpenMode) -> VfsResult<File> {
        path::split_file(path)?;
        let id = Resolver::lookup(cache, path)?;
        self.open_node(path, &id, mode)
    }

    /// Open `path`, creating the file (and, for `t` modes, its parent
    /// directories) when a write mode finds it missing.
    ///
    /// Side effects are not rolled back: a file created here stays in the
    /// provider and in the cache even if opening it then fails.
    #[instrument(level = "debug", skip(self, cache), fields(mode = %mode))]
    pub fn open(&self, cache: &mut TreeCache, path: &str, mode: OpenMode) -> VfsResult<File> {
        let (parent, name) = path::split_file(path)?;

        let id = match cache.identifier(path).cloned() {
            Some(id) => {
                if mode.writes() && !cache.touch_entry(parent, name, SystemTime::now()) {
                    debug!("Written file has no cached entry to touch");
                }
                id
            }
            None if mode.writes() => self.create_file(cache, path, parent, name, mode)?,
            None => return Err(VfsError::not_found(path)),
        };

        self.open_node(path, &id, mode)
    }

    fn create_file(
        &self,
        cache: &mut TreeCache,
        path: &str,
        parent: &str,
        name: &str,
        mode: OpenMode,
    ) -> VfsResult<NodeId> {
        let resolver = Resolver::new(self.provider, self.synthetic_size);
        let parent_id = resolver.resolve_or_create(cache, parent, mode.creates_parents())?;

        let id = self
            .provider
            .create_child(&parent_id, name, NodeKind::File)
            .map_err(|source| {
                warn!(path, error = %source, "Failed to create file");
                VfsError::CreateFailed {
                    path: path.to_string(),
                    source,
                }
            })?;
        debug!(id = %id, "Created file");

        cache.insert_file(path, id.clone());
        cache.push_entry(
            parent,
            DirEntry::synthetic(name, NodeKind::File, self.synthetic_size),
        );
        Ok(id)
    }

    fn open_node(&self, path: &str, id: &NodeId, mode: OpenMode) -> VfsResult<File> {
        self.provider.open(id, mode).map_err(|source| {
            warn!(path, error = %source, "Failed to open file");
            VfsError::OpenFailed {
                path: path.to_string(),
                source,
            }
        })
    }
}
