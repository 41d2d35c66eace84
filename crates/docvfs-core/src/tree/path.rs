//! Canonical path helpers.
//!
//! Canonical paths are plain strings: the root is `/`, directories end with
//! `/`, files do not, and segments are joined with `/`. Nothing here
//! normalizes repeated separators; callers supply well-formed paths.

use crate::error::{VfsError, VfsResult};

/// The root directory path.
pub const ROOT: &str = "/";

/// Path of the directory `name` inside directory `parent`.
pub fn child_dir_path(parent: &str, name: &str) -> String {
    format!("{parent}{name}/")
}

/// Path of the file `name` inside directory `parent`.
pub fn child_file_path(parent: &str, name: &str) -> String {
    format!("{parent}{name}")
}

#[inline]
pub fn is_dir_path(path: &str) -> bool {
    path.ends_with('/')
}

/// Split a directory path into its parent directory and final segment.
///
/// `/a/b/` splits into `("/a/", "b")`. The root has no parent.
pub fn split_dir(path: &str) -> VfsResult<(&str, &str)> {
    let malformed = || VfsError::MalformedPath(path.to_string());
    let trimmed = path.strip_suffix('/').ok_or_else(malformed)?;
    let boundary = trimmed.rfind('/').ok_or_else(malformed)?;
    let name = &trimmed[boundary + 1..];
    if name.is_empty() {
        return Err(malformed());
    }
    Ok((&path[..=boundary], name))
}

/// Split a file path into its parent directory and leaf name.
///
/// `/a/b.txt` splits into `("/a/", "b.txt")`.
pub fn split_file(path: &str) -> VfsResult<(&str, &str)> {
    let boundary = path
        .rfind('/')
        .ok_or_else(|| VfsError::MalformedPath(path.to_string()))?;
    let name = &path[boundary + 1..];
    if name.is_empty() {
        return Err(VfsError::MalformedPath(path.to_string()));
    }
    Ok((&path[..=boundary], name))
}

/// Number of directory levels below the root (`/` is 0, `/a/b/` is 2).
pub fn dir_depth(path: &str) -> usize {
    path.trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_paths() {
        assert_eq!(child_dir_path(ROOT, "roms"), "/roms/");
        assert_eq!(child_dir_path("/roms/", "neogeo"), "/roms/neogeo/");
        assert_eq!(child_file_path(ROOT, "sf2.zip"), "/sf2.zip");
        assert_eq!(child_file_path("/roms/", "sf2.zip"), "/roms/sf2.zip");
    }

    #[test]
    fn test_split_dir() {
        assert_eq!(split_dir("/a/").unwrap(), ("/", "a"));
        assert_eq!(split_dir("/a/b/").unwrap(), ("/a/", "b"));
    }

    #[test]
    fn test_split_dir_rejects_malformed() {
        for bad in ["/", "", "a/", "/a", "/a//", "//"] {
            assert!(
                matches!(split_dir(bad), Err(VfsError::MalformedPath(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_split_file() {
        assert_eq!(split_file("/c.txt").unwrap(), ("/", "c.txt"));
        assert_eq!(split_file("/a/b/c.txt").unwrap(), ("/a/b/", "c.txt"));
        assert!(split_file("c.txt").is_err());
        assert!(split_file("/a/").is_err());
    }

    #[test]
    fn test_dir_depth() {
        assert_eq!(dir_depth("/"), 0);
        assert_eq!(dir_depth("/a/"), 1);
        assert_eq!(dir_depth("/a/b/c/"), 3);
    }
}
