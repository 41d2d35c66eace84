//! Directory path to provider identifier resolution.
//!
//! Lookups are served from the [`TreeCache`]. When creation is allowed, a
//! missing directory is created in the provider after its parent has been
//! resolved (or created) first, so `/a/b/` creates `/a/` and then `/a/b/`.
//! Created directories are recorded in the cache, which makes repeated
//! calls with the same path free of provider traffic.

use tracing::{debug, instrument};

use crate::error::{VfsError, VfsResult};
use crate::provider::{NodeId, NodeKind, StorageProvider};
use crate::tree::path;
use crate::tree::{DirEntry, TreeCache};

/// Resolves directory paths, creating missing segments on request.
pub struct Resolver<'a> {
    provider: &'a dyn StorageProvider,
    synthetic_size: u64,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn StorageProvider, synthetic_size: u64) -> Self {
        Self {
            provider,
            synthetic_size,
        }
    }

    /// Look up a cached identifier without touching the provider.
    pub fn lookup(cache: &TreeCache, path: &str) -> VfsResult<NodeId> {
        cache
            .identifier(path)
            .cloned()
            .ok_or_else(|| VfsError::not_found(path))
    }

    /// Resolve the directory `path`, creating it and any missing ancestors
    /// when `allow_create` is set.
    #[instrument(level = "debug", skip(self, cache))]
    pub fn resolve_or_create(
        &self,
        cache: &mut TreeCache,
        path: &str,
        allow_create: bool,
    ) -> VfsResult<NodeId> {
        if let Some(id) = cache.identifier(path) {
            return Ok(id.clone());
        }
        if !allow_create || path == path::ROOT {
            return Err(VfsError::not_found(path));
        }

        let (parent, name) = path::split_dir(path)?;
        let parent_id = self.resolve_or_create(cache, parent, true)?;

        let id = self
            .provider
            .create_child(&parent_id, name, NodeKind::Directory)
            .map_err(|source| VfsError::CreateFailed {
                path: path.to_string(),
                source,
            })?;
        debug!(id = %id, "Created directory");

        cache.insert_dir(path, id.clone());
        cache.push_entry(
            parent,
            DirEntry::synthetic(name, NodeKind::Directory, self.synthetic_size),
        );
        Ok(id)
    }
}
