//! Snowflake database backend stub

use crate::error::{DbError, DbResult};
use crate::traits::{CommitMode, Database};
use async_trait::async_trait;

/// Snowflake database backend (stub implementation)
///
/// This is a placeholder for future Snowflake support.
pub struct SnowflakeBackend {
    // Connection details would go here
}

fn not_implemented(feature: &str) -> DbError {
    DbError::NotImplemented {
        backend: "snowflake".to_string(),
        feature: feature.to_string(),
    }
}

impl SnowflakeBackend {
    /// Create a new Snowflake backend (not yet implemented)
    pub fn new(_connection_string: &str) -> DbResult<Self> {
        Err(not_implemented("connect"))
    }
}

#[async_trait]
impl Database for SnowflakeBackend {
    async fn execute_batch(&self, _sql: &str, _mode: CommitMode) -> DbResult<()> {
        Err(not_implemented("execute_batch"))
    }

    async fn query_strings(&self, _sql: &str, _mode: CommitMode) -> DbResult<Vec<String>> {
        Err(not_implemented("query_strings"))
    }

    async fn create_database_if_not_exists(
        &self,
        _name: &str,
        _mode: CommitMode,
    ) -> DbResult<()> {
        Err(not_implemented("create_database_if_not_exists"))
    }

    async fn use_namespace(
        &self,
        _database: Option<&str>,
        _schema: Option<&str>,
    ) -> DbResult<()> {
        Err(not_implemented("use_namespace"))
    }

    fn db_type(&self) -> &'static str {
        "snowflake"
    }
}
