//! The storage provider seam.
//!
//! A provider exposes a tree of nodes that can only be reached through
//! opaque identifiers: there is no path-based access and no random-access
//! listing. The cached layer drives it through four calls:
//!
//! - [`StorageProvider::resolve_root`] turns a root locator into the root node id
//! - [`StorageProvider::list_children`] queries the children of one directory
//! - [`StorageProvider::create_child`] creates a file or directory under a parent
//! - [`StorageProvider::open`] opens a node and hands back an owned descriptor

pub mod local;

pub use local::LocalProvider;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::time::SystemTime;
use thiserror::Error;

use crate::access::OpenMode;

/// Opaque node identifier assigned by a provider.
///
/// The cached layer never interprets identifiers; it only stores them and
/// hands them back to the provider that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from the raw provider representation.
    #[inline]
    pub fn from_raw(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Get the raw string representation.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a provider node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    #[inline]
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

/// One row of a children query.
#[derive(Debug, Clone)]
pub struct ChildRow {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
    pub modified: SystemTime,
}

/// Errors reported by a storage provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No such node: {0}")]
    NoSuchNode(NodeId),

    #[error("Not a directory: {0}")]
    NotADirectory(NodeId),

    #[error("'{name}' already exists under {parent}")]
    AlreadyExists { parent: NodeId, name: String },

    #[error("Access denied: {0}")]
    Denied(String),

    #[error("{0}")]
    Other(String),
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Rows of a children query. Iteration itself may fail part way through.
pub type ChildRows<'a> = Box<dyn Iterator<Item = ProviderResult<ChildRow>> + 'a>;

/// A tree-structured, identifier-addressed storage backend.
pub trait StorageProvider: Send + Sync {
    /// Map a root locator (a tree URI, a host directory, ...) to the root node.
    fn resolve_root(&self, locator: &str) -> ProviderResult<NodeId>;

    /// Query the children of a directory node.
    ///
    /// `Ok(None)` means the query produced no result set at all, which the
    /// scanner treats exactly like a failed query.
    fn list_children(&self, parent: &NodeId) -> ProviderResult<Option<ChildRows<'_>>>;

    /// Create a child node named `name` under `parent`.
    fn create_child(&self, parent: &NodeId, name: &str, kind: NodeKind) -> ProviderResult<NodeId>;

    /// Open a node and return a detached descriptor owned by the caller.
    fn open(&self, node: &NodeId, mode: OpenMode) -> ProviderResult<File>;
}
