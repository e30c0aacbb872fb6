//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// How each call to the database is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Every statement is its own committed unit
    Autocommit,
    /// Each call runs inside `BEGIN` / `COMMIT`, rolled back on error
    #[default]
    Transactional,
}

impl CommitMode {
    /// Map the `--autocommit` flag to a commit mode
    pub fn from_autocommit(autocommit: bool) -> Self {
        if autocommit {
            CommitMode::Autocommit
        } else {
            CommitMode::Transactional
        }
    }
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitMode::Autocommit => write!(f, "autocommit"),
            CommitMode::Transactional => write!(f, "transactional"),
        }
    }
}

/// Database abstraction trait for snowchange
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements as a single batch
    async fn execute_batch(&self, sql: &str, mode: CommitMode) -> DbResult<()>;

    /// Run a query and return the first column of every row as text.
    ///
    /// NULL values are skipped.
    async fn query_strings(&self, sql: &str, mode: CommitMode) -> DbResult<Vec<String>>;

    /// Create a database (catalog) if it does not exist
    async fn create_database_if_not_exists(&self, name: &str, mode: CommitMode) -> DbResult<()>;

    /// Make `database` and/or `schema` the session default for unqualified names
    async fn use_namespace(&self, database: Option<&str>, schema: Option<&str>) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
