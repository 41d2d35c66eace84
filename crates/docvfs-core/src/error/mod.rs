//! Error types for the docvfs crate
//!
//! [`VfsError`] is the error every public operation of the cached layer
//! returns. Provider-level failures are carried as [`ProviderError`] sources
//! so callers can still see what the storage backend reported.

use thiserror::Error;

// Re-export error types from submodules
pub use crate::provider::ProviderError;

/// Errors surfaced by the cached filesystem layer.
#[derive(Debug, Error)]
pub enum VfsError {
    /// No root locator has been configured.
    #[error("No root has been set")]
    RootNotSet,

    /// The root-level listing failed; the rebuild was abandoned.
    #[error("Root '{root}' is unavailable: {reason}")]
    RootUnavailable { root: String, reason: String },

    /// A directory below the root could not be listed.
    ///
    /// Scans absorb this error; it only appears in logs and scan reports.
    #[error("Subtree '{path}' could not be read: {reason}")]
    SubtreeUnreadable { path: String, reason: String },

    /// The path is not in the cache and creation was not requested.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// The provider refused to create a directory or file.
    #[error("Failed to create '{path}': {source}")]
    CreateFailed {
        path: String,
        #[source]
        source: ProviderError,
    },

    /// The provider refused to open a resolved node.
    #[error("Failed to open '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: ProviderError,
    },

    /// The directory handle is closed or was never issued.
    #[error("Invalid directory handle: {0}")]
    InvalidHandle(u64),

    /// The path has no parent boundary or an empty segment.
    #[error("Malformed path: '{0}'")]
    MalformedPath(String),

    /// The open mode string is not one of the supported modes.
    #[error("Invalid open mode: '{0}'")]
    InvalidMode(String),
}

impl VfsError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        VfsError::NotFound { path: path.into() }
    }

    /// Returns true for [`VfsError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }

    /// Returns true when the error should be surfaced to the end user
    /// rather than reported to the immediate caller only.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, VfsError::RootUnavailable { .. })
    }
}

/// Result type for cached filesystem operations.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NodeId;
    use std::error::Error as _;

    #[test]
    fn test_not_found_display() {
        let err = VfsError::not_found("/roms/sf2.zip");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: /roms/sf2.zip");
    }

    #[test]
    fn test_create_failed_keeps_source() {
        let err = VfsError::CreateFailed {
            path: "/a/".to_string(),
            source: ProviderError::NoSuchNode(NodeId::from_raw("gone")),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/a/"));
    }

    #[test]
    fn test_only_root_unavailable_is_user_facing() {
        let root = VfsError::RootUnavailable {
            root: "content://x".to_string(),
            reason: "denied".to_string(),
        };
        assert!(root.is_user_facing());
        assert!(!VfsError::InvalidHandle(3).is_user_facing());
        assert!(!VfsError::MalformedPath("x".to_string()).is_user_facing());
    }
}
