//! End-to-end CLI tests for the urlgrab binary.
//!
//! Bodies are seeded directly into a cache directory so the binary answers
//! from the cache without touching the network.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const CACHED_URL: &str = "https://cached.example/page";
const MISSING_URL: &str = "https://cached.example/missing";

fn seeded_cache() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("cache-seeded"), "cached body\n").unwrap();
    std::fs::write(
        temp_dir.path().join("index.json"),
        json!({
            CACHED_URL: {"cacheName": "cache-seeded"},
            MISSING_URL: {"error": 1, "errorCode": 404},
        })
        .to_string(),
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("persistent on-disk cache"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("urlgrab"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_without_input_exits_cleanly_and_creates_nothing() {
    let work_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.current_dir(work_dir.path()).assert().success();
    assert!(!work_dir.path().join(".cache").exists());
}

#[test]
fn test_binary_prints_cached_body() {
    let cache = seeded_cache();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--cache-path")
        .arg(cache.path())
        .arg(CACHED_URL)
        .assert()
        .success()
        .stdout("cached body\n");
}

#[test]
fn test_binary_reads_urls_from_stdin() {
    let cache = seeded_cache();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--cache-path")
        .arg(cache.path())
        .write_stdin(format!("\n{CACHED_URL}\n\n{CACHED_URL}\n"))
        .assert()
        .success()
        .stdout("cached body\ncached body\n");
}

#[test]
fn test_binary_remembered_failure_exits_non_zero() {
    let cache = seeded_cache();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("--cache-path")
        .arg(cache.path())
        .arg(MISSING_URL)
        .arg(CACHED_URL)
        .assert()
        .failure()
        .stdout("cached body\n")
        .stderr(predicate::str::contains("404"))
        .stderr(predicate::str::contains("1 of 2 URLs failed"));
}

#[test]
fn test_binary_quiet_suppresses_info_logs() {
    let cache = seeded_cache();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    cmd.arg("-q")
        .arg("--cache-path")
        .arg(cache.path())
        .arg(CACHED_URL)
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("cache opened").not());
}

#[test]
fn test_binary_creates_default_cache_dir_under_cwd() {
    let work_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("urlgrab").unwrap();
    // An unparseable URL fails without network access but still opens the cache.
    cmd.current_dir(work_dir.path())
        .arg("--cache-dir-name")
        .arg("pages")
        .arg("not a url")
        .assert()
        .failure();
    assert!(work_dir.path().join("pages").is_dir());
}
