//! Integration tests for the snowchange binary
//!
//! Each test runs the compiled binary against a temporary script folder
//! backed by a file DuckDB database.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled snowchange binary
fn snowchange_bin() -> String {
    env!("CARGO_BIN_EXE_snowchange").to_string()
}

/// Run `snowchange` and return (stdout, stderr, success)
fn run_snowchange(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(snowchange_bin())
        .args(args)
        .env_remove("SNOWCHANGE_TARGET")
        .env_remove("RUST_LOG")
        .env("SNOWCHANGE_USER", "ci-runner")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute snowchange with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Script folder with two change scripts and a config pointing at a DuckDB
/// file inside `data`
fn setup_project(data: &Path) -> TempDir {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("V1__init.sql"),
        "CREATE TABLE customers (id INT);",
    )
    .unwrap();
    fs::create_dir(root.path().join("later")).unwrap();
    fs::write(
        root.path().join("later/V2__add_col.sql"),
        "ALTER TABLE customers ADD COLUMN name VARCHAR;",
    )
    .unwrap();

    let db_path = data.join("warehouse.duckdb");
    let config = format!(
        "database:\n  type: duckdb\n  path: \"{}\"\ntargets:\n  audit:\n    change_history_table: ops.audit.history\n",
        db_path.display()
    );
    fs::write(root.path().join("snowchange.yml"), config).unwrap();
    root
}

#[test]
fn test_deploy_then_rerun() {
    let data = TempDir::new().unwrap();
    let root = setup_project(data.path());
    let root_arg = root.path().to_str().unwrap();

    let (stdout, stderr, success) = run_snowchange(&["deploy", "-f", root_arg]);
    assert!(success, "first deploy failed: {}", stderr);
    assert!(stdout.contains("snowchange version: "));
    assert!(stdout.contains("Using change history table METADATA.SNOWCHANGE.CHANGE_HISTORY"));
    assert!(stdout.contains("Max applied change script version: None"));
    assert!(stdout.contains("Applying change script V1__init.sql"));
    assert!(stdout.contains("Applying change script V2__add_col.sql"));
    assert!(stdout.contains("Successfully applied 2 change scripts (skipping 0)"));
    assert!(stdout.contains("Completed successfully"));

    let (stdout, stderr, success) = run_snowchange(&["deploy", "-f", root_arg]);
    assert!(success, "second deploy failed: {}", stderr);
    assert!(stdout.contains("Max applied change script version: 2"));
    assert!(stdout.contains("Successfully applied 0 change scripts (skipping 2)"));
}

#[test]
fn test_target_overrides_change_history_table() {
    let data = TempDir::new().unwrap();
    let root = setup_project(data.path());
    let root_arg = root.path().to_str().unwrap();

    let (stdout, stderr, success) = run_snowchange(&["deploy", "-f", root_arg, "-t", "audit"]);
    assert!(success, "deploy failed: {}", stderr);
    assert!(stdout.contains("Using change history table OPS.AUDIT.HISTORY"));
    assert!(stdout.contains("Successfully applied 2 change scripts (skipping 0)"));
}

#[test]
fn test_unknown_target_fails() {
    let data = TempDir::new().unwrap();
    let root = setup_project(data.path());
    let root_arg = root.path().to_str().unwrap();

    let (_, stderr, success) = run_snowchange(&["deploy", "-f", root_arg, "-t", "nope"]);
    assert!(!success);
    assert!(stderr.contains("C004"), "stderr: {}", stderr);
}

#[test]
fn test_missing_root_folder_fails() {
    let data = TempDir::new().unwrap();
    let missing = data.path().join("does-not-exist");

    let (_, stderr, success) = run_snowchange(&["deploy", "-f", missing.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("S001"), "stderr: {}", stderr);
}

#[test]
fn test_failing_script_reports_script_name() {
    let data = TempDir::new().unwrap();
    let root = setup_project(data.path());
    fs::write(
        root.path().join("V3__broken.sql"),
        "SELECT * FROM table_that_does_not_exist",
    )
    .unwrap();
    let root_arg = root.path().to_str().unwrap();

    let (stdout, stderr, success) = run_snowchange(&["deploy", "-f", root_arg]);
    assert!(!success);
    assert!(stdout.contains("Applying change script V3__broken.sql"));
    assert!(stderr.contains("V3__broken.sql"), "stderr: {}", stderr);

    // V1 and V2 stay recorded
    fs::remove_file(root.path().join("V3__broken.sql")).unwrap();
    let (stdout, _, success) = run_snowchange(&["deploy", "-f", root_arg]);
    assert!(success);
    assert!(stdout.contains("Successfully applied 0 change scripts (skipping 2)"));
}

#[test]
fn test_verbose_prints_skips() {
    let data = TempDir::new().unwrap();
    let root = setup_project(data.path());
    let root_arg = root.path().to_str().unwrap();

    let (_, _, success) = run_snowchange(&["deploy", "-f", root_arg]);
    assert!(success);

    let (_, stderr, success) = run_snowchange(&["deploy", "-f", root_arg, "--verbose"]);
    assert!(success);
    assert!(stderr.contains("[verbose] Installed by: ci-runner"));
    assert!(stderr.contains(
        "[verbose] Skipping change script V1__init.sql because it's older than the most recently applied change (2)"
    ));
}
