//! Configuration file support for the docvfs CLI.
//!
//! The file is `config.toml` in `$DOCVFS_CONFIG_DIR`, or in the platform
//! configuration directory (`~/.config/docvfs/` on Linux).
//!
//! # Example configuration
//!
//! ```toml
//! root = "/mnt/sdcard/Roms"
//!
//! [cache]
//! max_depth = 6
//! progress = true
//!
//! [volumes]
//! primary = "/storage/emulated/0"
//! 1A2B-3C4D = "/storage/1A2B-3C4D"
//! ```
//!
//! With a `[volumes]` table, `content://` tree URIs are accepted as roots:
//!
//! ```bash
//! docvfs --root 'content://com.android.externalstorage.documents/tree/primary%3ARoms' ls
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docvfs_core::{VfsConfig, VolumeTable, path_from_document_uri};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "DOCVFS_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Root used when `--root` is not given
    pub root: Option<String>,

    /// Cache tunables
    #[serde(default)]
    pub cache: VfsConfig,

    /// Volume mount directories, for `content://` roots
    #[serde(default)]
    pub volumes: VolumeTable,
}

impl Config {
    /// Load configuration from `explicit`, or from the default path.
    ///
    /// A missing file at the default path yields the default configuration;
    /// a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path()?;
                if !path.exists() {
                    debug!(path = %path.display(), "No config file, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Turn a root argument into a locator the local provider understands.
    ///
    /// `content://` tree URIs are mapped through the volume table; anything
    /// else is used verbatim.
    pub fn resolve_root(&self, root: &str) -> Result<String> {
        if !root.starts_with("content://") {
            return Ok(root.to_string());
        }
        let path = path_from_document_uri(root, &self.volumes).with_context(|| {
            format!(
                "Cannot map '{root}' to a host path.\n\
                 Add the volume to the [volumes] table of {}",
                config_path().map_or_else(|_| CONFIG_FILE.to_string(), |p| p.display().to_string())
            )
        })?;
        debug!(uri = root, path = %path.display(), "Mapped document uri");
        Ok(path.display().to_string())
    }
}

/// Get the path to the configuration file.
pub fn config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE));
    }
    let dirs = directories::ProjectDirs::from("org", "docvfs", "docvfs")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.root.is_none());
        assert_eq!(config.cache, VfsConfig::default());
        assert!(config.volumes.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            root = "/mnt/roms"

            [cache]
            max_depth = 3
            progress = false

            [volumes]
            primary = "/storage/emulated/0"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.root.as_deref(), Some("/mnt/roms"));
        assert_eq!(config.cache.max_depth, 3);
        assert!(!config.cache.progress);
        assert_eq!(config.cache.synthetic_entry_size, 1);
        assert_eq!(
            config
                .resolve_root("content://com.android.externalstorage.documents/tree/primary%3ARoms")
                .unwrap(),
            "/storage/emulated/0/Roms"
        );
    }

    #[test]
    fn test_plain_roots_pass_through() {
        let config = Config::default();
        assert_eq!(config.resolve_root("/some/path").unwrap(), "/some/path");
        assert!(config.resolve_root("content://provider/tree/primary%3ARoms").is_err());
    }
}
