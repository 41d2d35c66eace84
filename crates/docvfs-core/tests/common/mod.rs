//! Common test utilities for docvfs-core integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use docvfs_core::testing::ScriptedProvider;
use docvfs_core::{CachedVfs, ErrorPresenter, ProgressNotifier, StorageProvider, VfsConfig};
use parking_lot::Mutex;

/// Locator used for the scripted root. The scripted provider ignores it.
pub const ROOT_LOCATOR: &str = "scripted://root";

static TRACING: Once = Once::new();

/// Install a test subscriber once. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Progress notifier that records every call.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl ProgressNotifier for RecordingNotifier {
    fn begin(&self, title: &str, message: &str) {
        self.events.lock().push(format!("begin:{title}|{message}"));
    }

    fn notify(&self, text: &str) {
        self.events.lock().push(text.to_string());
    }

    fn end(&self) {
        self.events.lock().push("end".to_string());
    }
}

/// Error presenter that records every message.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    messages: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ErrorPresenter for RecordingPresenter {
    fn present(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// A façade over a fresh scripted provider, with recording collaborators.
pub struct Harness {
    pub vfs: CachedVfs<ScriptedProvider>,
    pub notifier: Arc<RecordingNotifier>,
    pub presenter: Arc<RecordingPresenter>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(VfsConfig::default())
    }

    pub fn with_config(config: VfsConfig) -> Self {
        init_tracing();
        let notifier = Arc::new(RecordingNotifier::default());
        let presenter = Arc::new(RecordingPresenter::default());
        let vfs = CachedVfs::with_config(ScriptedProvider::new(), config)
            .with_notifier(Arc::clone(&notifier) as Arc<dyn ProgressNotifier>)
            .with_presenter(Arc::clone(&presenter) as Arc<dyn ErrorPresenter>);
        vfs.set_root(Some(ROOT_LOCATOR));
        Self {
            vfs,
            notifier,
            presenter,
        }
    }

    pub fn provider(&self) -> &ScriptedProvider {
        self.vfs.provider()
    }
}

/// Read every remaining entry name of an open handle.
pub fn drain<P: StorageProvider>(vfs: &CachedVfs<P>, handle: u64) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(entry) = vfs.read_next(handle).expect("handle should be valid") {
        names.push(entry.name);
    }
    names
}

/// Names in a cached directory, in listing order.
pub fn dir_names<P: StorageProvider>(vfs: &CachedVfs<P>, path: &str) -> Vec<String> {
    vfs.read_dir(path)
        .unwrap_or_else(|e| panic!("Failed to list {path}: {e}"))
        .into_iter()
        .map(|e| e.name)
        .collect()
}
