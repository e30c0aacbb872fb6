//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{CommitMode, Database};
use async_trait::async_trait;
use duckdb::Connection;
use sc_core::sql_utils::{quote_ident, quote_literal};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    /// Directory for the files backing databases created by
    /// [`Database::create_database_if_not_exists`]; `None` for in-memory.
    attach_dir: Option<PathBuf>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            attach_dir: None,
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        let attach_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Ok(Self {
            conn: Mutex::new(conn),
            attach_dir: Some(attach_dir),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `body` under the commit mode, rolling back on error in
    /// transactional mode.
    fn with_mode<F, T>(conn: &Connection, mode: CommitMode, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        if mode == CommitMode::Autocommit {
            return body(conn);
        }

        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = conn.execute_batch("COMMIT") {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = conn.execute_batch("ROLLBACK");
            }
        }
        result
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str, mode: CommitMode) -> DbResult<()> {
        let conn = self.lock()?;
        Self::with_mode(&conn, mode, |c| {
            c.execute_batch(sql)
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
        })
    }

    /// Query the first column of each row synchronously
    fn query_strings_sync(&self, sql: &str, mode: CommitMode) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        Self::with_mode(&conn, mode, |c| {
            let mut stmt = c
                .prepare(sql)
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
            let rows = stmt.query_map([], |row| row.get::<_, Option<String>>(0))?;

            let mut values = Vec::new();
            for row in rows {
                if let Some(value) = row? {
                    values.push(value);
                }
            }
            Ok(values)
        })
    }

    /// Check whether a catalog with this name is attached
    fn database_exists_sync(conn: &Connection, name: &str) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM duckdb_databases() WHERE lower(database_name) = lower(?)",
            duckdb::params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create_database_sync(&self, name: &str) -> DbResult<()> {
        let conn = self.lock()?;
        if Self::database_exists_sync(&conn, name)? {
            return Ok(());
        }

        // DuckDB has no CREATE DATABASE; a new catalog is an attached file
        // next to the main database, or another in-memory database.
        let location = match &self.attach_dir {
            Some(dir) => dir
                .join(format!("{}.duckdb", name.to_lowercase()))
                .display()
                .to_string(),
            None => ":memory:".to_string(),
        };
        let sql = format!(
            "ATTACH {} AS {}",
            quote_literal(&location),
            quote_ident(name)
        );
        log::debug!("Attaching database {} at {}", name, location);
        conn.execute_batch(&sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }
}

/// `USE` statement for the given namespace, `None` when both parts are unset
pub(crate) fn use_statement(database: Option<&str>, schema: Option<&str>) -> Option<String> {
    let target = match (database, schema) {
        (Some(db), Some(schema)) => format!("{}.{}", quote_ident(db), quote_ident(schema)),
        (Some(db), None) => quote_ident(db),
        (None, Some(schema)) => quote_ident(schema),
        (None, None) => return None,
    };
    Some(format!("USE {}", target))
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str, mode: CommitMode) -> DbResult<()> {
        self.execute_batch_sync(sql, mode)
    }

    async fn query_strings(&self, sql: &str, mode: CommitMode) -> DbResult<Vec<String>> {
        self.query_strings_sync(sql, mode)
    }

    // ATTACH is not transactional in DuckDB, so the commit mode is not applied.
    async fn create_database_if_not_exists(&self, name: &str, _mode: CommitMode) -> DbResult<()> {
        self.create_database_sync(name)
    }

    async fn use_namespace(&self, database: Option<&str>, schema: Option<&str>) -> DbResult<()> {
        match use_statement(database, schema) {
            Some(sql) => self.execute_batch_sync(&sql, CommitMode::Autocommit),
            None => Ok(()),
        }
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
