//! Provider backed by a directory tree on the host filesystem.
//!
//! Node identifiers are absolute host paths. The cached layer treats them as
//! opaque, so this provider is a convenient stand-in for a real document
//! provider in tools and tests.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use super::{ChildRow, ChildRows, NodeId, NodeKind, ProviderError, ProviderResult, StorageProvider};
use crate::access::OpenMode;

/// Storage provider over the host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProvider;

impl LocalProvider {
    pub fn new() -> Self {
        Self
    }

    fn node_path(node: &NodeId) -> &Path {
        Path::new(node.as_str())
    }

    fn node_id(path: &Path) -> ProviderResult<NodeId> {
        path.to_str()
            .map(NodeId::from_raw)
            .ok_or_else(|| ProviderError::Other(format!("non UTF-8 path: {}", path.display())))
    }

    fn map_io(node: &NodeId, err: io::Error) -> ProviderError {
        match err.kind() {
            io::ErrorKind::NotFound => ProviderError::NoSuchNode(node.clone()),
            io::ErrorKind::PermissionDenied => ProviderError::Denied(node.to_string()),
            _ => ProviderError::Io(err),
        }
    }

    fn row_for(entry: &fs::DirEntry) -> Option<ChildRow> {
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
            return None;
        };
        // Follow symlinks so a linked directory lists as a directory.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping entry without metadata");
                return None;
            }
        };
        let id = Self::node_id(&path).ok()?;
        let kind = if metadata.is_dir() {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        Some(ChildRow {
            id,
            name,
            kind,
            size: if kind.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
        })
    }
}

impl StorageProvider for LocalProvider {
    #[instrument(level = "debug", skip(self))]
    fn resolve_root(&self, locator: &str) -> ProviderResult<NodeId> {
        let root = fs::canonicalize(locator)
            .map_err(|e| Self::map_io(&NodeId::from_raw(locator), e))?;
        let id = Self::node_id(&root)?;
        if !root.is_dir() {
            return Err(ProviderError::NotADirectory(id));
        }
        debug!(root = %id, "Resolved local root");
        Ok(id)
    }

    fn list_children(&self, parent: &NodeId) -> ProviderResult<Option<ChildRows<'_>>> {
        let entries = fs::read_dir(Self::node_path(parent)).map_err(|e| Self::map_io(parent, e))?;

        let mut rows = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::map_io(parent, e))?;
            if let Some(row) = Self::row_for(&entry) {
                rows.push(row);
            }
        }
        // read_dir order is unspecified; keep listings stable across scans.
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Some(Box::new(rows.into_iter().map(Ok))))
    }

    #[instrument(level = "debug", skip(self), fields(parent = %parent))]
    fn create_child(&self, parent: &NodeId, name: &str, kind: NodeKind) -> ProviderResult<NodeId> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ProviderError::Other(format!("invalid child name: {name:?}")));
        }
        let path: PathBuf = Self::node_path(parent).join(name);
        let created = match kind {
            NodeKind::Directory => fs::create_dir(&path),
            NodeKind::File => OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map(drop),
        };
        created.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ProviderError::AlreadyExists {
                parent: parent.clone(),
                name: name.to_string(),
            },
            _ => Self::map_io(parent, e),
        })?;
        Self::node_id(&path)
    }

    fn open(&self, node: &NodeId, mode: OpenMode) -> ProviderResult<File> {
        mode.to_open_options()
            .open(Self::node_path(node))
            .map_err(|e| Self::map_io(node, e))
    }
}
