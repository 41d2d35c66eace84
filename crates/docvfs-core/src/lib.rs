//! Cached, path-addressed file system layer over identifier-based document
//! providers.
//!
//! A [`StorageProvider`] exposes a tree of opaque node ids. [`CachedVfs`]
//! scans that tree once into a path-keyed cache and answers listing,
//! resolution and open requests by canonical path (`/`, `/roms/`,
//! `/roms/sf2.zip`).
//!
//! ```no_run
//! use docvfs_core::{CachedVfs, LocalProvider, OpenMode};
//!
//! let vfs = CachedVfs::new(LocalProvider);
//! vfs.set_root(Some("/mnt/roms"));
//! for name in vfs.list_root_names()? {
//!     println!("{name}");
//! }
//! let file = vfs.open_file("/cfg/default.cfg", OpenMode::WRITE_TRUNCATE)?;
//! # drop(file);
//! # Ok::<(), docvfs_core::VfsError>(())
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod handles;
pub mod notify;
pub mod provider;
pub mod resolver;
pub mod testing;
pub mod tree;
pub mod vfs;
pub mod volume;

pub use access::OpenMode;
pub use config::VfsConfig;
pub use error::{ProviderError, VfsError, VfsResult};
pub use handles::INVALID_HANDLE;
pub use notify::{ErrorPresenter, ProgressNotifier};
pub use provider::{LocalProvider, NodeId, NodeKind, StorageProvider};
pub use tree::{CacheStats, DirEntry, ScanReport};
pub use vfs::CachedVfs;
pub use volume::{VolumeLookup, VolumeTable, path_from_document_uri};
