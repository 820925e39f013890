//! E2E CLI lifecycle tests.
//!
//! Each test runs the `todo` binary as a subprocess against a database in
//! an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the todo binary with its database in `dir`.
fn todo_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("todo"));
    cmd.current_dir(dir);
    cmd.env("TODO_DB_PATH", db_path(dir));
    // Never read the developer's real config directory
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env_remove("DEBUG");
    cmd.env_remove("TODO_LOG_FORMAT");
    // Keep stderr free of tracing output
    cmd.env("TODO_LOG", "error");
    cmd
}

/// `<config_dir>/todo` as the binary sees it under [`todo_cmd`].
fn app_config_dir(dir: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        dir.join("Library").join("Application Support").join("todo")
    } else {
        dir.join("xdg").join("todo")
    }
}

fn write_config(dir: &Path, content: &str) {
    let config_dir = app_config_dir(dir);
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("config.toml"), content).expect("write config.toml");
}

fn db_path(dir: &Path) -> PathBuf {
    dir.join("todo.db")
}

/// Create an item via CLI, return its ID.
fn create_item(dir: &Path, name: &str) -> i64 {
    let output = todo_cmd(dir)
        .args(["create", name, "--json"])
        .output()
        .expect("create should not crash");
    assert!(
        output.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("create --json should produce valid JSON");
    json["id"].as_i64().expect("create output should have 'id'")
}

fn list_json(dir: &Path) -> Vec<Value> {
    let output = todo_cmd(dir)
        .args(["list", "--json"])
        .output()
        .expect("list should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("list --json is JSON");
    json.as_array().expect("list --json is an array").clone()
}

fn list_text(dir: &Path) -> String {
    let output = todo_cmd(dir).arg("list").output().expect("list");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("utf-8")
}

fn row_for(listing: &str, id: i64) -> Option<String> {
    let id = id.to_string();
    listing
        .lines()
        .find(|line| line.split_whitespace().next() == Some(id.as_str()))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_list_complete_remove() {
    let dir = TempDir::new().expect("tempdir");

    todo_cmd(dir.path())
        .args(["create", "buy milk"])
        .assert()
        .success()
        .stdout("Created new todo: buy milk\n");

    let listing = list_text(dir.path());
    assert!(listing.starts_with("ID"), "header first: {listing}");
    let id = list_json(dir.path())[0]["id"].as_i64().expect("id");
    let row = row_for(&listing, id).expect("row for new item");
    assert!(row.contains("buy milk"));
    assert!(row.ends_with('✗'));

    todo_cmd(dir.path())
        .args(["complete", &id.to_string()])
        .assert()
        .success()
        .stdout("Completed item\n");
    let row = row_for(&list_text(dir.path()), id).expect("row after complete");
    assert!(row.ends_with('✓'));

    todo_cmd(dir.path())
        .args(["remove", &id.to_string()])
        .assert()
        .success()
        .stdout("Removed item\n");
    assert_eq!(list_text(dir.path()), "No todo items...\n");
}

#[test]
fn update_renames_item() {
    let dir = TempDir::new().expect("tempdir");
    let id = create_item(dir.path(), "draft");

    todo_cmd(dir.path())
        .args(["update", &id.to_string(), "final"])
        .assert()
        .success()
        .stdout("Updated item\n");

    let items = list_json(dir.path());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "final");
    assert_eq!(items[0]["is_completed"], false);
}

#[test]
fn list_puts_open_items_first() {
    let dir = TempDir::new().expect("tempdir");
    let first = create_item(dir.path(), "first");
    let second = create_item(dir.path(), "second");
    todo_cmd(dir.path())
        .args(["complete", &first.to_string()])
        .assert()
        .success();

    let ids: Vec<i64> = list_json(dir.path())
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![second, first]);
}

// ---------------------------------------------------------------------------
// Not found and failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_id_is_reported_but_succeeds() {
    let dir = TempDir::new().expect("tempdir");

    for args in [
        vec!["update", "999999", "x"],
        vec!["complete", "999999"],
        vec!["remove", "999999"],
    ] {
        todo_cmd(dir.path())
            .args(&args)
            .assert()
            .success()
            .stdout("No todo item exists with ID 999999\n");
    }
}

#[test]
fn unknown_id_json_outcome() {
    let dir = TempDir::new().expect("tempdir");
    let output = todo_cmd(dir.path())
        .args(["complete", "42", "--json"])
        .output()
        .expect("complete");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["ok"], false);
    assert_eq!(json["outcome"], "not_found");
    assert_eq!(json["id"], 42);
}

#[test]
fn empty_name_fails_with_generic_message() {
    let dir = TempDir::new().expect("tempdir");

    todo_cmd(dir.path())
        .args(["create", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "An error occurred while creating the todo item",
        ))
        .stderr(predicate::str::contains("cannot be empty").not());

    assert!(list_json(dir.path()).is_empty());
}

#[test]
fn empty_rename_fails() {
    let dir = TempDir::new().expect("tempdir");
    let id = create_item(dir.path(), "keep me");

    todo_cmd(dir.path())
        .args(["update", &id.to_string(), ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "An error occurred while updating the todo item",
        ));

    assert_eq!(list_json(dir.path())[0]["name"], "keep me");
}

#[test]
fn json_error_carries_code() {
    let dir = TempDir::new().expect("tempdir");
    let output = todo_cmd(dir.path())
        .args(["create", "", "--json"])
        .output()
        .expect("create");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(json["error"]["error_code"], "E2001");
}

#[test]
fn non_numeric_id_is_a_usage_error() {
    let dir = TempDir::new().expect("tempdir");
    todo_cmd(dir.path())
        .args(["remove", "abc"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Database location
// ---------------------------------------------------------------------------

#[test]
fn db_flag_overrides_environment() {
    let dir = TempDir::new().expect("tempdir");
    let other = dir.path().join("nested").join("other.db");

    todo_cmd(dir.path())
        .args(["--db", other.to_str().expect("utf-8 path"), "create", "elsewhere"])
        .assert()
        .success();

    assert!(other.exists(), "parent directories are created");
    assert!(list_json(dir.path()).is_empty());
}

#[test]
fn broken_config_does_not_block_db_flag() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[database\n");
    let explicit = dir.path().join("explicit.db");

    todo_cmd(dir.path())
        .env_remove("TODO_DB_PATH")
        .args(["--db", explicit.to_str().expect("utf-8 path"), "create", "x"])
        .assert()
        .success()
        .stdout("Created new todo: x\n");
    assert!(explicit.exists());
}

#[test]
fn broken_config_does_not_block_env_path() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[database\n");

    create_item(dir.path(), "still works");
    assert_eq!(list_json(dir.path()).len(), 1);
}

#[test]
fn broken_config_without_override_is_a_config_error() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "[database\n");

    let output = todo_cmd(dir.path())
        .env_remove("TODO_DB_PATH")
        .args(["list", "--json"])
        .output()
        .expect("list");
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(
        json["error"]["message"],
        "An error occurred while locating the todo database"
    );
    assert_eq!(json["error"]["error_code"], "E1001");
}

#[test]
fn config_file_database_path_is_used() {
    let dir = TempDir::new().expect("tempdir");
    let configured = dir.path().join("from-config.db");
    write_config(
        dir.path(),
        &format!("[database]\npath = {:?}\n", configured.to_str().expect("utf-8 path")),
    );

    todo_cmd(dir.path())
        .env_remove("TODO_DB_PATH")
        .args(["create", "configured"])
        .assert()
        .success();
    assert!(configured.exists());
    assert!(!db_path(dir.path()).exists());
}

#[test]
fn reopening_keeps_data_and_schema_version() {
    let dir = TempDir::new().expect("tempdir");
    create_item(dir.path(), "persisted");
    create_item(dir.path(), "again");

    let conn = rusqlite::Connection::open(db_path(dir.path())).expect("open db");
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .expect("user_version");
    assert_eq!(version, 2);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 2);
}

#[test]
fn unreadable_database_fails_cleanly() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(db_path(dir.path()), vec![b'x'; 4096]).expect("write junk");

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "An error occurred while opening the todo database",
        ));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[test]
fn verbose_logs_go_to_stderr_only() {
    let dir = TempDir::new().expect("tempdir");
    let output = todo_cmd(dir.path())
        .env_remove("TODO_LOG")
        .args(["-v", "list"])
        .output()
        .expect("list");
    assert!(output.status.success());

    assert_eq!(String::from_utf8_lossy(&output.stdout), "No todo items...\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("opened todo database"),
        "debug line missing from stderr: {stderr}"
    );
}

#[test]
fn debug_env_zero_keeps_logs_quiet() {
    let dir = TempDir::new().expect("tempdir");
    todo_cmd(dir.path())
        .env_remove("TODO_LOG")
        .env("DEBUG", "0")
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("opened todo database").not());
}

#[test]
fn json_log_format_emits_json_lines() {
    let dir = TempDir::new().expect("tempdir");
    let output = todo_cmd(dir.path())
        .env_remove("TODO_LOG")
        .env("TODO_LOG_FORMAT", "json")
        .args(["-v", "list"])
        .output()
        .expect("list");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No todo items...\n");

    let stderr = String::from_utf8(output.stderr).expect("utf-8 logs");
    let records: Vec<Value> = stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("every log line is JSON"))
        .collect();
    assert!(!records.is_empty());
    assert!(records.iter().any(|record| {
        record["level"] == "DEBUG"
            && record["target"]
                .as_str()
                .is_some_and(|target| target.starts_with("todo_core"))
    }));
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

#[test]
fn completions_do_not_touch_the_database() {
    let dir = TempDir::new().expect("tempdir");
    todo_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo"));
    assert!(!db_path(dir.path()).exists());
}
