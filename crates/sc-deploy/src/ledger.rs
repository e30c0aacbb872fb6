//! The change history table.
//!
//! One row is appended per applied change script. Rows are never updated or
//! deleted, so the set of rows is the record of what has been applied.

use crate::error::{DeployError, DeployResult};
use sc_core::sql_utils::quote_literal;
use sc_core::{ChangeHistoryTableRef, ScriptRecord};
use sc_db::{CommitMode, Database, DbError};
use std::sync::Arc;

/// Outcome recorded in the `STATUS` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Success,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Success => "Success",
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the change history table.
///
/// `INSTALLED_ON` is not part of the entry: the database fills it in when the
/// row is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHistoryEntry {
    pub version: String,
    pub description: String,
    pub script_name: String,
    pub script_type: String,
    pub checksum: String,
    pub execution_time_secs: i64,
    pub status: ChangeStatus,
    pub installed_by: String,
}

impl ChangeHistoryEntry {
    /// Entry for a script that was applied successfully
    pub fn success(
        script: &ScriptRecord,
        checksum: String,
        execution_time_secs: i64,
        installed_by: &str,
    ) -> Self {
        Self {
            version: script.version.clone(),
            description: script.description.clone(),
            script_name: script.name.clone(),
            script_type: script.script_type.as_str().to_string(),
            checksum,
            execution_time_secs,
            status: ChangeStatus::Success,
            installed_by: installed_by.to_string(),
        }
    }
}

/// Access to the change history table through a [`Database`]
pub struct ChangeHistory {
    db: Arc<dyn Database>,
    table: ChangeHistoryTableRef,
    mode: CommitMode,
}

impl ChangeHistory {
    pub fn new(db: Arc<dyn Database>, table: ChangeHistoryTableRef, mode: CommitMode) -> Self {
        Self { db, table, mode }
    }

    pub fn table(&self) -> &ChangeHistoryTableRef {
        &self.table
    }

    fn ledger_error(&self, step: &'static str) -> impl FnOnce(DbError) -> DeployError + '_ {
        move |source| DeployError::Ledger {
            step,
            table: self.table.to_string(),
            source,
        }
    }

    /// Create the database, schema, and table, in that order, when missing.
    ///
    /// Safe to call on every run.
    pub async fn ensure_table_exists(&self) -> DeployResult<()> {
        self.db
            .create_database_if_not_exists(&self.table.database, self.mode)
            .await
            .map_err(self.ledger_error("create database for"))?;

        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", self.table.quoted_schema());
        log::debug!("SQL query: {}", sql);
        self.db
            .execute_batch(&sql, self.mode)
            .await
            .map_err(self.ledger_error("create schema for"))?;

        let sql = create_table_sql(&self.table);
        log::debug!("SQL query: {}", sql);
        self.db
            .execute_batch(&sql, self.mode)
            .await
            .map_err(self.ledger_error("create"))?;

        Ok(())
    }

    /// Every version ever recorded, in no particular order
    pub async fn fetch_applied_versions(&self) -> DeployResult<Vec<String>> {
        let sql = format!("SELECT VERSION FROM {}", self.table.quoted());
        log::debug!("SQL query: {}", sql);
        self.db
            .query_strings(&sql, self.mode)
            .await
            .map_err(self.ledger_error("read"))
    }

    /// Insert exactly one row for `entry`
    pub async fn append(&self, entry: &ChangeHistoryEntry) -> DeployResult<()> {
        let sql = insert_sql(&self.table, entry);
        log::debug!("SQL query: {}", sql);
        self.db
            .execute_batch(&sql, self.mode)
            .await
            .map_err(self.ledger_error("append to"))
    }
}

pub(crate) fn create_table_sql(table: &ChangeHistoryTableRef) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         VERSION VARCHAR, \
         DESCRIPTION VARCHAR, \
         SCRIPT VARCHAR, \
         SCRIPT_TYPE VARCHAR, \
         CHECKSUM VARCHAR, \
         EXECUTION_TIME BIGINT, \
         STATUS VARCHAR, \
         INSTALLED_BY VARCHAR, \
         INSTALLED_ON TIMESTAMP)",
        table.quoted()
    )
}

pub(crate) fn insert_sql(table: &ChangeHistoryTableRef, entry: &ChangeHistoryEntry) -> String {
    format!(
        "INSERT INTO {} (VERSION, DESCRIPTION, SCRIPT, SCRIPT_TYPE, CHECKSUM, EXECUTION_TIME, STATUS, INSTALLED_BY, INSTALLED_ON) \
         VALUES ({}, {}, {}, {}, {}, {}, {}, {}, CURRENT_TIMESTAMP)",
        table.quoted(),
        quote_literal(&entry.version),
        quote_literal(&entry.description),
        quote_literal(&entry.script_name),
        quote_literal(&entry.script_type),
        quote_literal(&entry.checksum),
        entry.execution_time_secs,
        quote_literal(entry.status.as_str()),
        quote_literal(&entry.installed_by),
    )
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
