//! Exit codes for the CLI.
//!
//! These follow common Unix conventions and provide meaningful
//! status information for scripting and automation.

use docvfs_core::VfsError;

/// General/unspecified error
pub const GENERAL_ERROR: u8 = 1;

/// Command-line usage error (bad arguments, malformed paths, missing root)
pub const USAGE_ERROR: u8 = 2;

/// The root could not be listed
pub const ROOT_UNAVAILABLE: u8 = 3;

/// File or directory not found in the cached tree
pub const NOT_FOUND: u8 = 4;

/// The provider refused to create or open a node
pub const IO_ERROR: u8 = 5;

/// Exit code for an error returned by a command.
pub fn for_error(err: &anyhow::Error) -> u8 {
    let Some(vfs) = err.chain().find_map(|e| e.downcast_ref::<VfsError>()) else {
        return GENERAL_ERROR;
    };
    match vfs {
        VfsError::RootNotSet | VfsError::MalformedPath(_) | VfsError::InvalidMode(_) => USAGE_ERROR,
        VfsError::RootUnavailable { .. } => ROOT_UNAVAILABLE,
        VfsError::NotFound { .. } => NOT_FOUND,
        VfsError::CreateFailed { .. } | VfsError::OpenFailed { .. } => IO_ERROR,
        VfsError::SubtreeUnreadable { .. } | VfsError::InvalidHandle(_) => GENERAL_ERROR,
    }
}
