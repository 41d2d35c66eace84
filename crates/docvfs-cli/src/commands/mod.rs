pub mod cat;
pub mod ls;
pub mod mkdir;
pub mod roots;
pub mod stat;
pub mod stats;
pub mod tree;
pub mod write;

use docvfs_core::{CachedVfs, LocalProvider};

/// The façade every command runs against.
pub type Vfs = CachedVfs<LocalProvider>;

/// Normalize a path to ensure it starts with `/`.
/// This makes paths like `test.txt` work the same as `/test.txt`.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Normalize a directory path: leading and trailing `/`.
pub fn normalize_dir(path: &str) -> String {
    let path = normalize_path(path);
    if path.ends_with('/') {
        path
    } else {
        format!("{path}/")
    }
}
