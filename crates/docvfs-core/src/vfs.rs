//! The path-addressed façade over a storage provider.
//!
//! [`CachedVfs`] owns one [`TreeCache`] with an explicit lifecycle: it
//! starts empty, is built by the first operation that needs it (or by an
//! explicit [`CachedVfs::rebuild`]), and is replaced wholesale by later
//! rebuilds.
//!
//! # Locking
//!
//! The cache sits behind a single `RwLock`. A rebuild holds the write lock
//! for the whole scan, so concurrent readers wait for it to finish and no
//! two rebuilds can overlap. Creating files or directories also takes the
//! write lock. Directory handles live in their own table and keep working
//! across rebuilds.
//!
//! Rebuilds are slow and I/O bound. Call them from a context that can
//! afford to block.

use std::fmt;
use std::fs::File;
use std::sync::Arc;

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use tracing::{debug, error, info, instrument, warn};

use crate::access::{FileAccess, OpenMode};
use crate::config::VfsConfig;
use crate::error::{VfsError, VfsResult};
use crate::handles::DirHandleTable;
use crate::notify::{
    ErrorPresenter, ProgressNotifier, TracingNotifier, TracingPresenter, root_unavailable_message,
};
use crate::provider::{NodeId, StorageProvider};
use crate::resolver::Resolver;
use crate::tree::path;
use crate::tree::{CacheStats, DirEntry, ScanReport, Scanner, TreeCache};

/// Cached, path-addressed view of a [`StorageProvider`].
pub struct CachedVfs<P> {
    provider: P,
    config: VfsConfig,
    root: RwLock<Option<String>>,
    cache: RwLock<Option<TreeCache>>,
    handles: DirHandleTable,
    notifier: Arc<dyn ProgressNotifier>,
    presenter: Arc<dyn ErrorPresenter>,
}

impl<P: fmt::Debug> fmt::Debug for CachedVfs<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root.read().clone();
        let built = self.cache.read().is_some();
        f.debug_struct("CachedVfs")
            .field("provider", &self.provider)
            .field("config", &self.config)
            .field("root", &root)
            .field("built", &built)
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl<P: StorageProvider> CachedVfs<P> {
    /// Create a façade with the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, VfsConfig::default())
    }

    pub fn with_config(provider: P, config: VfsConfig) -> Self {
        Self {
            provider,
            config,
            root: RwLock::new(None),
            cache: RwLock::new(None),
            handles: DirHandleTable::new(),
            notifier: Arc::new(TracingNotifier),
            presenter: Arc::new(TracingPresenter),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn ProgressNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_presenter(mut self, presenter: Arc<dyn ErrorPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &VfsConfig {
        &self.config
    }

    /// Set or clear the root locator.
    ///
    /// Switching to a different root drops the cache; the next operation
    /// rebuilds against the new root.
    #[instrument(level = "info", skip(self))]
    pub fn set_root(&self, locator: Option<&str>) {
        let mut root = self.root.write();
        if root.as_deref() == locator {
            return;
        }
        *root = locator.map(str::to_string);
        drop(root);

        *self.cache.write() = None;
        info!("Root changed, cache dropped");
    }

    /// The current root locator.
    pub fn root(&self) -> Option<String> {
        self.root.read().clone()
    }

    /// Whether a cache is present (built at least once since the last root change).
    pub fn is_built(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Rebuild the cache. Without `force`, an existing cache is kept.
    ///
    /// Returns true iff the root-level listing succeeded (or nothing had to
    /// be done).
    pub fn rebuild(&self, force: bool) -> bool {
        match self.try_rebuild(force) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Rebuild failed");
                false
            }
        }
    }

    /// Rebuild the cache, returning the scan report when a scan ran.
    pub fn try_rebuild(&self, force: bool) -> VfsResult<Option<ScanReport>> {
        let mut slot = self.cache.write();
        if slot.is_some() && !force {
            return Ok(None);
        }
        self.rebuild_into(&mut slot).map(Some)
    }

    #[instrument(level = "info", skip_all)]
    fn rebuild_into(&self, slot: &mut Option<TreeCache>) -> VfsResult<ScanReport> {
        // On failure an empty tree stays installed so later calls do not
        // rescan implicitly; callers retry with a forced rebuild.
        let Some(locator) = self.root() else {
            error!("Root is not set, cannot list files");
            return Err(VfsError::RootNotSet);
        };
        *slot = None;

        let root_id = match self.provider.resolve_root(&locator) {
            Ok(id) => id,
            Err(e) => {
                *slot = Some(TreeCache::unresolved());
                return Err(self.root_unavailable(&locator, e.to_string()));
            }
        };

        self.notifier.begin("Caching files.", "Reading, please wait...");
        let mut scanner = Scanner::new(&self.provider, self.config.effective_max_depth());
        if self.config.progress {
            scanner = scanner.with_notifier(self.notifier.as_ref());
        }
        let scanned = scanner.scan(&root_id);
        self.notifier.end();

        match scanned {
            Ok(tree) => {
                *slot = Some(tree.cache);
                Ok(tree.report)
            }
            Err(failure) => {
                *slot = Some(TreeCache::new(root_id));
                Err(self.root_unavailable(&locator, failure.to_string()))
            }
        }
    }

    fn root_unavailable(&self, locator: &str, reason: String) -> VfsError {
        error!(root = locator, reason = %reason, "Root listing failed");
        self.presenter.present(&root_unavailable_message(locator));
        VfsError::RootUnavailable {
            root: locator.to_string(),
            reason,
        }
    }

    fn ensure_built(&self, slot: &mut Option<TreeCache>) -> VfsResult<()> {
        if slot.is_none() {
            warn!("Cache accessed before it was built, forcing a rebuild");
            self.rebuild_into(slot)?;
        }
        Ok(())
    }

    fn read_cache(&self) -> VfsResult<MappedRwLockReadGuard<'_, TreeCache>> {
        if let Ok(cache) = RwLockReadGuard::try_map(self.cache.read(), |cache| cache.as_ref()) {
            return Ok(cache);
        }
        let mut slot = self.cache.write();
        self.ensure_built(&mut slot)?;
        RwLockReadGuard::try_map(RwLockWriteGuard::downgrade(slot), |cache| cache.as_ref())
            .map_err(|_| VfsError::RootNotSet)
    }

    fn write_cache(&self) -> VfsResult<MappedRwLockWriteGuard<'_, TreeCache>> {
        let mut slot = self.cache.write();
        self.ensure_built(&mut slot)?;
        RwLockWriteGuard::try_map(slot, |cache| cache.as_mut()).map_err(|_| VfsError::RootNotSet)
    }

    /// Names of the entries directly under the root.
    pub fn list_root_names(&self) -> VfsResult<Vec<String>> {
        Ok(self.read_cache()?.root_names())
    }

    /// Open the cached directory `path` for iteration.
    #[instrument(level = "debug", skip(self))]
    pub fn open_dir(&self, path: &str) -> VfsResult<u64> {
        let entries = self
            .read_cache()?
            .children(path)
            .ok_or_else(|| VfsError::not_found(path))?;
        let handle = self.handles.open(path, entries);
        debug!(handle, "Opened directory");
        Ok(handle)
    }

    /// Next entry of an open directory, or `None` once exhausted.
    pub fn read_next(&self, handle: u64) -> VfsResult<Option<DirEntry>> {
        self.handles.next(handle)
    }

    /// Close a directory handle. Returns whether it was open.
    pub fn close_dir(&self, handle: u64) -> bool {
        self.handles.close(handle)
    }

    /// Snapshot of a cached directory's entries.
    pub fn read_dir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let entries = self
            .read_cache()?
            .children(path)
            .ok_or_else(|| VfsError::not_found(path))?;
        let snapshot = entries.read().clone();
        Ok(snapshot)
    }

    /// Cached entry for a file or directory path.
    pub fn entry(&self, path: &str) -> VfsResult<DirEntry> {
        let (parent, name) = if path::is_dir_path(path) {
            path::split_dir(path)?
        } else {
            path::split_file(path)?
        };
        self.read_cache()?
            .find_entry(parent, name)
            .ok_or_else(|| VfsError::not_found(path))
    }

    /// Cached identifier for `path`. Never calls the provider.
    pub fn resolve(&self, path: &str) -> VfsResult<NodeId> {
        let cache = self.read_cache()?;
        Resolver::lookup(&cache, path)
    }

    /// Identifier of the directory `path`, creating it and any missing
    /// ancestors when `allow_create` is set.
    pub fn resolve_or_create(&self, path: &str, allow_create: bool) -> VfsResult<NodeId> {
        if !allow_create {
            return self.resolve(path);
        }
        let mut cache = self.write_cache()?;
        Resolver::new(&self.provider, self.config.synthetic_entry_size)
            .resolve_or_create(&mut cache, path, true)
    }

    /// Open the file at `path` and return its descriptor.
    pub fn open_file(&self, path: &str, mode: OpenMode) -> VfsResult<File> {
        let access = FileAccess::new(&self.provider, self.config.synthetic_entry_size);
        if mode.writes() {
            let mut cache = self.write_cache()?;
            access.open(&mut cache, path, mode)
        } else {
            let cache = self.read_cache()?;
            access.open_existing(&cache, path, mode)
        }
    }

    /// Get cache statistics for monitoring and debugging.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self
            .cache
            .read()
            .as_ref()
            .map(TreeCache::stats)
            .unwrap_or_default();
        stats.open_handles = self.handles.len();
        stats
    }
}
