//! End-to-end deploy runs against DuckDB
//!
//! Every test builds a throwaway change script folder and runs the full
//! bootstrap, reconcile, and apply cycle.

use sc_core::ChangeHistoryTableRef;
use sc_db::{CommitMode, Database, DuckDbBackend};
use sc_deploy::{DeployConfig, DeployError, DeployOutcome, Deployer, NoopHooks};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_script(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn config(root: &Path, table: ChangeHistoryTableRef, mode: CommitMode) -> DeployConfig {
    DeployConfig {
        root_folder: root.to_path_buf(),
        change_history_table: table,
        mode,
        installed_by: "integration".to_string(),
    }
}

async fn run(db: Arc<dyn Database>, config: DeployConfig) -> Result<DeployOutcome, DeployError> {
    Deployer::new(db, config).run(&NoopHooks).await
}

async fn history_versions(db: &Arc<dyn Database>, table: &ChangeHistoryTableRef) -> Vec<String> {
    let mut versions = db
        .query_strings(
            &format!("SELECT VERSION FROM {}", table.quoted()),
            CommitMode::Autocommit,
        )
        .await
        .unwrap();
    versions.sort();
    versions
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let scripts = TempDir::new().unwrap();
    write_script(scripts.path(), "V1.1__create_orders.sql", "CREATE TABLE orders (id INT);");
    write_script(
        scripts.path(),
        "sub/V1.2__seed_orders.sql",
        "INSERT INTO orders VALUES (1), (2);",
    );

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let table = ChangeHistoryTableRef::default();
    let cfg = config(scripts.path(), table.clone(), CommitMode::Transactional);

    let first = run(db.clone(), cfg.clone()).await.unwrap();
    assert_eq!(
        first,
        DeployOutcome {
            applied: 2,
            skipped: 0
        }
    );

    let second = run(db.clone(), cfg).await.unwrap();
    assert_eq!(
        second,
        DeployOutcome {
            applied: 0,
            skipped: 2
        }
    );

    assert_eq!(history_versions(&db, &table).await, vec!["1.1", "1.2"]);

    let rows = db
        .query_strings("SELECT CAST(COUNT(*) AS VARCHAR) FROM orders", CommitMode::Autocommit)
        .await
        .unwrap();
    assert_eq!(rows, vec!["2".to_string()]);
}

#[tokio::test]
async fn test_new_script_applied_on_next_run() {
    let scripts = TempDir::new().unwrap();
    write_script(scripts.path(), "V1__first.sql", "CREATE TABLE t1 (id INT)");

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let cfg = config(
        scripts.path(),
        ChangeHistoryTableRef::default(),
        CommitMode::Transactional,
    );
    assert_eq!(run(db.clone(), cfg.clone()).await.unwrap().applied, 1);

    write_script(scripts.path(), "V2__second.sql", "CREATE TABLE t2 (id INT)");
    let outcome = run(db.clone(), cfg).await.unwrap();
    assert_eq!(
        outcome,
        DeployOutcome {
            applied: 1,
            skipped: 1
        }
    );
}

#[tokio::test]
async fn test_file_backed_history_survives_reconnect() {
    let scripts = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    write_script(scripts.path(), "V1__create.sql", "CREATE TABLE kept (id INT)");

    let db_path = data.path().join("warehouse.duckdb");
    let table = ChangeHistoryTableRef::default();
    let cfg = config(scripts.path(), table.clone(), CommitMode::Transactional);

    {
        let db: Arc<dyn Database> = Arc::new(DuckDbBackend::from_path(&db_path).unwrap());
        assert_eq!(run(db, cfg.clone()).await.unwrap().applied, 1);
    }

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::from_path(&db_path).unwrap());
    let outcome = run(db.clone(), cfg).await.unwrap();
    assert_eq!(
        outcome,
        DeployOutcome {
            applied: 0,
            skipped: 1
        }
    );
    assert_eq!(history_versions(&db, &table).await, vec!["1"]);
}

#[tokio::test]
async fn test_autocommit_mode_applies_scripts() {
    let scripts = TempDir::new().unwrap();
    write_script(
        scripts.path(),
        "V1__multi.sql",
        "CREATE TABLE a (id INT); CREATE TABLE b (id INT);",
    );

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let cfg = config(
        scripts.path(),
        ChangeHistoryTableRef::default(),
        CommitMode::Autocommit,
    );
    assert_eq!(run(db.clone(), cfg).await.unwrap().applied, 1);

    db.execute_batch("SELECT * FROM a; SELECT * FROM b", CommitMode::Autocommit)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_custom_change_history_table() {
    let scripts = TempDir::new().unwrap();
    write_script(scripts.path(), "V1__noop.sql", "SELECT 1");

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let table = ChangeHistoryTableRef::resolve(Some("ops.audit.deploys")).unwrap();
    assert_eq!(table.to_string(), "OPS.AUDIT.DEPLOYS");

    let cfg = config(scripts.path(), table.clone(), CommitMode::Transactional);
    run(db.clone(), cfg).await.unwrap();

    assert_eq!(history_versions(&db, &table).await, vec!["1"]);
}

#[tokio::test]
async fn test_failed_script_rolls_back_and_resumes() {
    let scripts = TempDir::new().unwrap();
    write_script(scripts.path(), "V1__ok.sql", "CREATE TABLE ok_table (id INT)");
    write_script(
        scripts.path(),
        "V2__broken.sql",
        "CREATE TABLE half (id INT); SELECT * FROM no_such_table",
    );

    let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
    let table = ChangeHistoryTableRef::default();
    let cfg = config(scripts.path(), table.clone(), CommitMode::Transactional);

    let err = run(db.clone(), cfg.clone()).await.unwrap_err();
    assert!(matches!(err, DeployError::Apply { .. }));
    assert!(err.to_string().contains("V2__broken.sql"));
    assert_eq!(history_versions(&db, &table).await, vec!["1"]);

    // Rolled back, so the retry can create the table again
    write_script(scripts.path(), "V2__broken.sql", "CREATE TABLE half (id INT)");
    let outcome = run(db.clone(), cfg).await.unwrap();
    assert_eq!(
        outcome,
        DeployOutcome {
            applied: 1,
            skipped: 1
        }
    );
}
