//! Translation of tree document URIs into host paths.
//!
//! Document providers hand out tree URIs such as
//! `content://com.android.externalstorage.documents/tree/primary%3ARoms`.
//! The second path segment is a document id of the form `<volume>:<path>`,
//! where `<volume>` is `primary` or the uuid of a removable volume. Given a
//! table of volume mount points the id maps back to a host path, which is
//! handy for diagnostics and for tools that can bypass the provider.

use std::collections::BTreeMap;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Name of the built-in primary volume.
pub const PRIMARY_VOLUME: &str = "primary";

/// Source of volume mount directories.
pub trait VolumeLookup {
    /// Mount directory of the primary volume.
    fn primary(&self) -> Option<PathBuf>;

    /// Mount directory of the volume with `uuid`.
    fn by_uuid(&self, uuid: &str) -> Option<PathBuf>;
}

/// Static volume table, keyed by volume name (`primary` or a uuid).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeTable {
    volumes: BTreeMap<String, PathBuf>,
}

impl VolumeTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_volume(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.insert(name, dir);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, dir: impl Into<PathBuf>) {
        self.volumes.insert(name.into(), dir.into());
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        self.volumes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, dir)| dir.clone())
    }
}

impl VolumeLookup for VolumeTable {
    fn primary(&self) -> Option<PathBuf> {
        self.find(PRIMARY_VOLUME)
    }

    fn by_uuid(&self, uuid: &str) -> Option<PathBuf> {
        self.find(uuid)
    }
}

/// Host path behind a tree document URI, or `None` when the URI is
/// malformed or names an unknown volume.
pub fn path_from_document_uri(uri: &str, volumes: &dyn VolumeLookup) -> Option<PathBuf> {
    let url = Url::parse(uri).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    let document_id = percent_decode_str(segments.get(1)?).decode_utf8().ok()?;

    let mut parts: Vec<&str> = document_id.split(':').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    match parts.as_slice() {
        [] => None,
        [single] => {
            if single.starts_with('/') {
                Some(PathBuf::from(single))
            } else {
                Some(PathBuf::from(format!("/{single}")))
            }
        }
        [volume, relative, ..] => {
            let dir = if volume.eq_ignore_ascii_case(PRIMARY_VOLUME) {
                volumes.primary()
            } else {
                volumes.by_uuid(volume)
            };
            let Some(dir) = dir else {
                debug!(volume, "Unknown volume in document uri");
                return None;
            };
            Some(PathBuf::from(format!("{}/{relative}", dir.display())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volumes() -> VolumeTable {
        VolumeTable::new()
            .with_volume("primary", "/storage/emulated/0")
            .with_volume("1A2B-3C4D", "/storage/1A2B-3C4D")
    }

    #[test]
    fn test_primary_volume() {
        let path = path_from_document_uri(
            "content://com.android.externalstorage.documents/tree/primary%3ARoms",
            &volumes(),
        );
        assert_eq!(path, Some(PathBuf::from("/storage/emulated/0/Roms")));
    }

    #[test]
    fn test_nested_relative_path() {
        let path = path_from_document_uri(
            "content://com.android.externalstorage.documents/tree/primary%3AGames%2FMAME",
            &volumes(),
        );
        assert_eq!(path, Some(PathBuf::from("/storage/emulated/0/Games/MAME")));
    }

    #[test]
    fn test_volume_uuid_is_case_insensitive() {
        let path = path_from_document_uri(
            "content://com.android.externalstorage.documents/tree/1a2b-3c4d%3ARoms",
            &volumes(),
        );
        assert_eq!(path, Some(PathBuf::from("/storage/1A2B-3C4D/Roms")));
    }

    #[test]
    fn test_unknown_volume() {
        let path = path_from_document_uri(
            "content://com.android.externalstorage.documents/tree/FFFF-0000%3ARoms",
            &volumes(),
        );
        assert_eq!(path, None);
    }

    #[test]
    fn test_single_part_document_id() {
        let table = volumes();
        assert_eq!(
            path_from_document_uri("content://provider/tree/%2Fmnt%2Froms", &table),
            Some(PathBuf::from("/mnt/roms"))
        );
        assert_eq!(
            path_from_document_uri("content://provider/tree/roms", &table),
            Some(PathBuf::from("/roms"))
        );
        // A trailing separator leaves a single part
        assert_eq!(
            path_from_document_uri("content://provider/tree/primary%3A", &table),
            Some(PathBuf::from("/primary"))
        );
    }

    #[test]
    fn test_malformed_uris() {
        let table = volumes();
        assert_eq!(path_from_document_uri("not a uri", &table), None);
        assert_eq!(path_from_document_uri("content://provider/tree", &table), None);
    }

    #[test]
    fn test_volume_table_serde() {
        let table: VolumeTable = serde_json::from_str(r#"{"primary": "/sdcard"}"#).unwrap();
        assert_eq!(table.primary(), Some(PathBuf::from("/sdcard")));
        assert!(!table.is_empty());
    }
}
