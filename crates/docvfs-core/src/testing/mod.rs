//! Testing utilities for code built on the cached layer.
//!
//! [`ScriptedProvider`] is an in-memory provider with opaque uuid node ids.
//! File bodies live in a private temporary directory so `open` can hand out
//! real descriptors. Every call is recorded, and failures can be injected
//! per node:
//!
//! ```ignore
//! use docvfs_core::testing::ScriptedProvider;
//!
//! let provider = ScriptedProvider::new();
//! let roms = provider.add_dir(&provider.root_id(), "roms");
//! provider.add_file(&roms, "sf2.zip", b"zip");
//! provider.fail_listing(&roms);
//! ```

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tempfile::TempDir;
use uuid::Uuid;

use crate::access::OpenMode;
use crate::provider::{
    ChildRow, ChildRows, NodeId, NodeKind, ProviderError, ProviderResult, StorageProvider,
};

/// Modification time given to nodes added through the builder methods.
pub const FIXTURE_MTIME: Duration = Duration::from_secs(1_600_000_000);

/// A provider call, as recorded by [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    ResolveRoot(String),
    List(NodeId),
    Create {
        parent: NodeId,
        name: String,
        kind: NodeKind,
    },
    Open(NodeId),
}

#[derive(Debug)]
struct Node {
    name: String,
    kind: NodeKind,
    size: u64,
    modified: SystemTime,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Faults {
    failing_lists: HashSet<NodeId>,
    empty_lists: HashSet<NodeId>,
    truncated_lists: HashMap<NodeId, usize>,
    refused_creates: HashSet<String>,
    refused_opens: HashSet<NodeId>,
    refused_open_names: HashSet<String>,
}

#[derive(Debug)]
struct State {
    nodes: HashMap<NodeId, Node>,
    faults: Faults,
    calls: Vec<ProviderCall>,
}

/// Scriptable in-memory provider.
#[derive(Debug)]
pub struct ScriptedProvider {
    root: NodeId,
    state: Mutex<State>,
    blobs: TempDir,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Create a provider holding an empty root directory.
    pub fn new() -> Self {
        let root = NodeId::from_raw(format!("root-{}", Uuid::new_v4()));
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node {
                name: String::new(),
                kind: NodeKind::Directory,
                size: 0,
                modified: UNIX_EPOCH + FIXTURE_MTIME,
                children: Vec::new(),
            },
        );
        Self {
            root,
            state: Mutex::new(State {
                nodes,
                faults: Faults::default(),
                calls: Vec::new(),
            }),
            blobs: TempDir::new().expect("Failed to create blob directory"),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root.clone()
    }

    fn blob_path(&self, id: &NodeId) -> PathBuf {
        self.blobs.path().join(id.as_str())
    }

    fn insert_node(
        &self,
        state: &mut State,
        parent: &NodeId,
        name: &str,
        kind: NodeKind,
        size: u64,
        modified: SystemTime,
    ) -> ProviderResult<NodeId> {
        let parent_node = state
            .nodes
            .get(parent)
            .ok_or_else(|| ProviderError::NoSuchNode(parent.clone()))?;
        if !parent_node.kind.is_dir() {
            return Err(ProviderError::NotADirectory(parent.clone()));
        }
        if parent_node
            .children
            .iter()
            .any(|c| state.nodes.get(c).is_some_and(|n| n.name == name))
        {
            return Err(ProviderError::AlreadyExists {
                parent: parent.clone(),
                name: name.to_string(),
            });
        }

        let id = NodeId::from_raw(Uuid::new_v4().to_string());
        if kind == NodeKind::File {
            File::create(self.blob_path(&id))?;
        }
        state.nodes.insert(
            id.clone(),
            Node {
                name: name.to_string(),
                kind,
                size,
                modified,
                children: Vec::new(),
            },
        );
        if let Some(parent_node) = state.nodes.get_mut(parent) {
            parent_node.children.push(id.clone());
        }
        Ok(id)
    }

    /// Add a directory under `parent`.
    pub fn add_dir(&self, parent: &NodeId, name: &str) -> NodeId {
        let mut state = self.state.lock();
        self.insert_node(
            &mut state,
            parent,
            name,
            NodeKind::Directory,
            0,
            UNIX_EPOCH + FIXTURE_MTIME,
        )
        .expect("Failed to add directory")
    }

    /// Add a file with `contents` under `parent`.
    pub fn add_file(&self, parent: &NodeId, name: &str, contents: &[u8]) -> NodeId {
        let mut state = self.state.lock();
        let id = self
            .insert_node(
                &mut state,
                parent,
                name,
                NodeKind::File,
                contents.len() as u64,
                UNIX_EPOCH + FIXTURE_MTIME,
            )
            .expect("Failed to add file");
        std::fs::write(self.blob_path(&id), contents).expect("Failed to write blob");
        id
    }

    /// Add a chain of nested directories below the root and return their ids,
    /// outermost first. `add_dirs(&["a", "b"])` builds `/a/b/`.
    pub fn add_dirs(&self, names: &[&str]) -> Vec<NodeId> {
        let mut parent = self.root_id();
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            parent = self.add_dir(&parent, name);
            ids.push(parent.clone());
        }
        ids
    }

    /// Id of the child called `name` under `parent`, if it exists.
    pub fn child_named(&self, parent: &NodeId, name: &str) -> Option<NodeId> {
        let state = self.state.lock();
        let node = state.nodes.get(parent)?;
        node.children
            .iter()
            .find(|c| state.nodes.get(*c).is_some_and(|n| n.name == name))
            .cloned()
    }

    /// Kind of a node, if it exists.
    pub fn kind_of(&self, id: &NodeId) -> Option<NodeKind> {
        self.state.lock().nodes.get(id).map(|n| n.kind)
    }

    /// Current contents of a file node.
    pub fn contents(&self, id: &NodeId) -> Vec<u8> {
        std::fs::read(self.blob_path(id)).unwrap_or_default()
    }

    /// Listing `id` fails with an error.
    pub fn fail_listing(&self, id: &NodeId) {
        self.state.lock().faults.failing_lists.insert(id.clone());
    }

    /// Listing `id` returns no result set.
    pub fn return_no_result_set(&self, id: &NodeId) {
        self.state.lock().faults.empty_lists.insert(id.clone());
    }

    /// Listing `id` yields `rows` rows and then fails.
    pub fn fail_listing_after(&self, id: &NodeId, rows: usize) {
        self.state.lock().faults.truncated_lists.insert(id.clone(), rows);
    }

    /// Creating a child called `name` anywhere fails.
    pub fn refuse_create(&self, name: &str) {
        self.state.lock().faults.refused_creates.insert(name.to_string());
    }

    /// Opening `id` fails.
    pub fn refuse_open(&self, id: &NodeId) {
        self.state.lock().faults.refused_opens.insert(id.clone());
    }

    /// Opening any node called `name` fails, including nodes created later.
    pub fn refuse_open_named(&self, name: &str) {
        self.state
            .lock()
            .faults
            .refused_open_names
            .insert(name.to_string());
    }

    /// Remove every injected failure.
    pub fn heal(&self) {
        self.state.lock().faults = Faults::default();
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().calls.clone()
    }

    /// Recorded create calls as `(parent, name, kind)`.
    pub fn creates(&self) -> Vec<(NodeId, String, NodeKind)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::Create { parent, name, kind } => Some((parent, name, kind)),
                _ => None,
            })
            .collect()
    }

    /// Number of children queries issued.
    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProviderCall::List(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl StorageProvider for ScriptedProvider {
    fn resolve_root(&self, locator: &str) -> ProviderResult<NodeId> {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::ResolveRoot(locator.to_string()));
        Ok(self.root.clone())
    }

    fn list_children(&self, parent: &NodeId) -> ProviderResult<Option<ChildRows<'_>>> {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::List(parent.clone()));

        if state.faults.failing_lists.contains(parent) {
            return Err(ProviderError::Denied(parent.to_string()));
        }
        if state.faults.empty_lists.contains(parent) {
            return Ok(None);
        }

        let node = state
            .nodes
            .get(parent)
            .ok_or_else(|| ProviderError::NoSuchNode(parent.clone()))?;
        if !node.kind.is_dir() {
            return Err(ProviderError::NotADirectory(parent.clone()));
        }

        let rows: Vec<ChildRow> = node
            .children
            .iter()
            .filter_map(|id| {
                state.nodes.get(id).map(|child| ChildRow {
                    id: id.clone(),
                    name: child.name.clone(),
                    kind: child.kind,
                    size: child.size,
                    modified: child.modified,
                })
            })
            .collect();

        match state.faults.truncated_lists.get(parent).copied() {
            Some(limit) => {
                let failure = std::iter::once(Err(ProviderError::Other(format!(
                    "cursor for {parent} failed after {limit} rows"
                ))));
                Ok(Some(Box::new(
                    rows.into_iter().take(limit).map(Ok).chain(failure),
                )))
            }
            None => Ok(Some(Box::new(rows.into_iter().map(Ok)))),
        }
    }

    fn create_child(&self, parent: &NodeId, name: &str, kind: NodeKind) -> ProviderResult<NodeId> {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::Create {
            parent: parent.clone(),
            name: name.to_string(),
            kind,
        });
        if state.faults.refused_creates.contains(name) {
            return Err(ProviderError::Denied(format!("create {name}")));
        }
        self.insert_node(&mut state, parent, name, kind, 0, SystemTime::now())
    }

    fn open(&self, node: &NodeId, mode: OpenMode) -> ProviderResult<File> {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::Open(node.clone()));
        let refused_by_name = state
            .nodes
            .get(node)
            .is_some_and(|n| state.faults.refused_open_names.contains(&n.name));
        if refused_by_name || state.faults.refused_opens.contains(node) {
            return Err(ProviderError::Denied(format!("open {node}")));
        }
        match state.nodes.get(node).map(|n| n.kind) {
            Some(NodeKind::File) => Ok(mode.to_open_options().open(self.blob_path(node))?),
            Some(NodeKind::Directory) => {
                Err(ProviderError::Other(format!("{node} is a directory")))
            }
            None => Err(ProviderError::NoSuchNode(node.clone())),
        }
    }
}
