//! Error types for sc-deploy

use sc_core::CoreError;
use sc_db::DbError;
use thiserror::Error;

/// Errors that abort a deploy run
#[derive(Error, Debug)]
pub enum DeployError {
    /// Discovery, configuration, or script read failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// L001: A change history table operation failed
    #[error("[L001] Failed to {step} change history table {table}: {source}")]
    Ledger {
        step: &'static str,
        table: String,
        source: DbError,
    },

    /// A001: A change script failed to execute
    #[error("[A001] Failed to apply change script {script}: {source}")]
    Apply { script: String, source: DbError },
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;
