//! Recursive discovery of a provider tree.
//!
//! The scanner walks depth-first from the root, issuing one children query
//! per directory, and fills a fresh [`TreeCache`]. Two failure rules apply:
//!
//! - a failed query at the root fails the scan
//! - a failed query anywhere below is logged and skipped; the directory
//!   stays in its parent's list with an empty child list, and its siblings
//!   are still scanned
//!
//! A query that yields no result set and a query whose rows fail part way
//! through are handled exactly like a query that errors up front.

use std::fmt;

use tracing::{info, instrument, trace, warn};

use super::cache::TreeCache;
use super::entry::DirEntry;
use super::path::{self, ROOT};
use crate::error::VfsError;
use crate::notify::ProgressNotifier;
use crate::provider::{NodeId, ProviderError, StorageProvider};

/// Why a single directory listing failed.
#[derive(Debug)]
pub enum ListingFailure {
    /// The provider answered without a result set.
    NoResultSet,
    /// The query or the row iteration failed.
    Provider(ProviderError),
}

impl fmt::Display for ListingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingFailure::NoResultSet => f.write_str("query returned no result set"),
            ListingFailure::Provider(e) => write!(f, "{e}"),
        }
    }
}

/// Summary of one completed scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub directories: usize,
    pub files: usize,
    /// Directories whose own listing failed, in discovery order.
    pub unreadable: Vec<String>,
    /// Directories at the depth bound, cached but not listed.
    pub truncated: Vec<String>,
}

/// A successfully scanned tree.
#[derive(Debug)]
pub struct ScannedTree {
    pub cache: TreeCache,
    pub report: ScanReport,
}

/// Mutable builder state threaded through the recursion.
struct ScanContext {
    cache: TreeCache,
    report: ScanReport,
}

/// Depth-bounded tree scanner.
pub struct Scanner<'a> {
    provider: &'a dyn StorageProvider,
    notifier: Option<&'a dyn ProgressNotifier>,
    max_depth: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(provider: &'a dyn StorageProvider, max_depth: usize) -> Self {
        Self {
            provider,
            notifier: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Report each cached file name to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a dyn ProgressNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Scan the whole tree below `root`.
    ///
    /// Fails only when the root itself cannot be listed.
    #[instrument(level = "info", skip(self), fields(root = %root, max_depth = self.max_depth))]
    pub fn scan(&self, root: &NodeId) -> Result<ScannedTree, ListingFailure> {
        let mut ctx = ScanContext {
            cache: TreeCache::new(root.clone()),
            report: ScanReport::default(),
        };

        self.visit(&mut ctx, root, ROOT, 0)?;

        info!(
            directories = ctx.report.directories,
            files = ctx.report.files,
            unreadable = ctx.report.unreadable.len(),
            "Scan complete"
        );
        Ok(ScannedTree {
            cache: ctx.cache,
            report: ctx.report,
        })
    }

    fn visit(
        &self,
        ctx: &mut ScanContext,
        dir_id: &NodeId,
        dir_path: &str,
        depth: usize,
    ) -> Result<(), ListingFailure> {
        let rows = self
            .provider
            .list_children(dir_id)
            .map_err(ListingFailure::Provider)?
            .ok_or(ListingFailure::NoResultSet)?;

        for row in rows {
            let row = row.map_err(ListingFailure::Provider)?;
            trace!(path = dir_path, name = %row.name, kind = ?row.kind, "Scanned entry");
            ctx.cache.push_entry(dir_path, DirEntry::from(&row));

            if row.kind.is_dir() {
                let child_path = path::child_dir_path(dir_path, &row.name);
                ctx.cache.insert_dir(&child_path, row.id.clone());
                ctx.report.directories += 1;

                if depth + 1 >= self.max_depth {
                    trace!(path = %child_path, "Reached depth bound");
                    ctx.report.truncated.push(child_path);
                } else if let Err(failure) = self.visit(ctx, &row.id, &child_path, depth + 1) {
                    let skipped = VfsError::SubtreeUnreadable {
                        path: child_path.clone(),
                        reason: failure.to_string(),
                    };
                    warn!(error = %skipped, "Skipping subtree");
                    ctx.report.unreadable.push(child_path);
                }
            } else {
                ctx.cache
                    .insert_file(&path::child_file_path(dir_path, &row.name), row.id);
                ctx.report.files += 1;
                if let Some(notifier) = self.notifier {
                    notifier.notify(&format!("Caching: {}", row.name));
                }
            }
        }
        Ok(())
    }
}
