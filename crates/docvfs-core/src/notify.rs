//! Collaborators that report scan progress and failures to the user.
//!
//! Both are fire-and-forget: nothing they do feeds back into cache state.
//! The defaults forward everything to `tracing`.

use tracing::{debug, error, info, trace};

/// Receives human-readable status while a rebuild runs.
pub trait ProgressNotifier: Send + Sync {
    /// A rebuild started.
    fn begin(&self, _title: &str, _message: &str) {}

    /// Status update (e.g. the name of the file being cached).
    fn notify(&self, text: &str);

    /// The rebuild finished, successfully or not.
    fn end(&self) {}
}

/// Surfaces root access failures to the end user.
pub trait ErrorPresenter: Send + Sync {
    fn present(&self, message: &str);
}

/// Progress notifier that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl ProgressNotifier for TracingNotifier {
    fn begin(&self, title: &str, message: &str) {
        info!(title, message, "Rebuild started");
    }

    fn notify(&self, text: &str) {
        trace!("{text}");
    }

    fn end(&self) {
        debug!("Rebuild finished");
    }
}

/// Error presenter that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl ErrorPresenter for TracingPresenter {
    fn present(&self, message: &str) {
        error!("{message}");
    }
}

/// Message shown when the root cannot be read.
pub fn root_unavailable_message(root: &str) -> String {
    format!(
        "No permission to read the files under {root}.\n\n\
         Grant access to the folder again or select another root folder."
    )
}
