#![allow(deprecated)] // cargo_bin! macro doesn't exist yet in assert_cmd 2.1

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated, empty configuration directory.
fn docvfs(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docvfs").unwrap();
    cmd.env("DOCVFS_CONFIG_DIR", config_dir.path());
    cmd.env_remove("DOCVFS_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A small host tree:
///
/// ```text
/// cfg/
/// roms/
///   arcade/
///     pacman.zip
///   readme.txt
/// ```
fn create_tree() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path();
    fs::create_dir_all(root.join("roms/arcade")).unwrap();
    fs::write(root.join("roms/arcade/pacman.zip"), b"pacman").unwrap();
    fs::write(root.join("roms/readme.txt"), b"hello roms\n").unwrap();
    fs::create_dir(root.join("cfg")).unwrap();
    temp
}

fn root_arg(tree: &TempDir) -> String {
    tree.path().to_str().unwrap().to_string()
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn test_help() {
    let config = TempDir::new().unwrap();
    docvfs(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("roots"))
        .stdout(predicate::str::contains("ls"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("write"));
}

#[test]
fn test_version() {
    let config = TempDir::new().unwrap();
    docvfs(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docvfs"));
}

#[test]
fn test_missing_root() {
    let config = TempDir::new().unwrap();
    docvfs(&config)
        .arg("roots")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--root"));
}

#[test]
fn test_unreadable_root_is_presented() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();
    let missing = tree.path().join("missing");

    docvfs(&config)
        .args(["--root", missing.to_str().unwrap(), "roots"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No permission to read the files"));
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_roots() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "roots"])
        .assert()
        .success()
        .stdout("cfg\nroms\n");
}

#[test]
fn test_root_from_env() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .env("DOCVFS_ROOT", root_arg(&tree))
        .arg("roots")
        .assert()
        .success()
        .stdout(predicate::str::contains("roms"));
}

#[test]
fn test_ls_subdirectory() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "ls", "roms"])
        .assert()
        .success()
        .stdout("arcade/\nreadme.txt\n");
}

#[test]
fn test_ls_long() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "ls", "-l", "/roms/arcade/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Size"))
        .stdout(predicate::str::contains("pacman.zip"))
        .stdout(predicate::str::contains("6B"));
}

#[test]
fn test_ls_json() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    let output = docvfs(&config)
        .args(["--root", &root_arg(&tree), "ls", "--json", "/roms/"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "arcade");
    assert_eq!(entries[0]["kind"], "directory");
    assert_eq!(entries[1]["name"], "readme.txt");
    assert_eq!(entries[1]["size"], 11);
}

#[test]
fn test_ls_missing_directory() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "ls", "/nope/"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("/nope/"));
}

#[test]
fn test_tree() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── cfg/"))
        .stdout(predicate::str::contains("└── roms/"))
        .stdout(predicate::str::contains("pacman.zip"));

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "tree", "-d", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roms/"))
        .stdout(predicate::str::contains("pacman.zip").not());
}

// ============================================================================
// File access
// ============================================================================

#[test]
fn test_cat() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "cat", "roms/readme.txt"])
        .assert()
        .success()
        .stdout("hello roms\n");
}

#[test]
fn test_cat_missing_file() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "cat", "/nope.txt"])
        .assert()
        .code(4);
}

#[test]
fn test_write_creates_parents() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "write", "/cfg/mame/default.cfg"])
        .write_stdin("<mameconfig/>")
        .assert()
        .success();

    let written = fs::read_to_string(tree.path().join("cfg/mame/default.cfg")).unwrap();
    assert_eq!(written, "<mameconfig/>");
}

#[test]
fn test_write_without_parents_fails() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "write", "--mode", "w", "/new/file.txt"])
        .write_stdin("data")
        .assert()
        .code(4);
    assert!(!tree.path().join("new").exists());
}

#[test]
fn test_write_append() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "write", "-m", "wa", "/roms/readme.txt"])
        .write_stdin("more\n")
        .assert()
        .success();

    let content = fs::read_to_string(tree.path().join("roms/readme.txt")).unwrap();
    assert_eq!(content, "hello roms\nmore\n");
}

#[test]
fn test_write_rejects_read_mode() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "write", "--mode", "r", "/x.txt"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not write"));

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "write", "--mode", "zz", "/x.txt"])
        .assert()
        .failure();
}

#[test]
fn test_mkdir() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "mkdir", "saves/slot1"])
        .assert()
        .success();
    assert!(tree.path().join("saves/slot1").is_dir());

    // Existing directories resolve without error.
    docvfs(&config)
        .args(["--root", &root_arg(&tree), "mkdir", "saves/slot1"])
        .assert()
        .success();
}

#[test]
fn test_stat() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "stat", "/roms/arcade/pacman.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file"))
        .stdout(predicate::str::contains("6B"));

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "stat", "/roms/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("directory"));
}

// ============================================================================
// Statistics and configuration
// ============================================================================

#[test]
fn test_stats_json() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    let output = docvfs(&config)
        .args(["--root", &root_arg(&tree), "stats", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["cache"]["directories"], 4);
    assert_eq!(stats["cache"]["entries"], 5);
    assert_eq!(stats["scan"]["files"], 2);
    assert_eq!(stats["scan"]["unreadable"].as_array().unwrap().len(), 0);
}

#[test]
fn test_config_depth_and_root() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();
    fs::write(
        config.path().join("config.toml"),
        format!(
            "root = {:?}\n\n[cache]\nmax_depth = 1\n",
            tree.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let output = docvfs(&config)
        .args(["stats", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["scan"]["truncated"].as_array().unwrap().len(), 2);
    assert_eq!(stats["scan"]["files"], 0);
}

#[test]
fn test_content_uri_root() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();
    fs::write(
        config.path().join("config.toml"),
        format!(
            "[volumes]\nprimary = {:?}\n",
            tree.path().to_str().unwrap()
        ),
    )
    .unwrap();

    docvfs(&config)
        .args([
            "--root",
            "content://com.android.externalstorage.documents/tree/primary%3Aroms",
            "roots",
        ])
        .assert()
        .success()
        .stdout("arcade\nreadme.txt\n");
}

#[test]
fn test_explicit_config_missing() {
    let config = TempDir::new().unwrap();
    let tree = create_tree();

    docvfs(&config)
        .args(["--root", &root_arg(&tree), "--config", "/definitely/not/here.toml", "roots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
