//! sc-db - Database abstraction layer for snowchange
//!
//! This crate provides the `Database` trait and implementations
//! for DuckDB (and a Snowflake stub for future implementation).

pub mod duckdb;
pub mod error;
pub(crate) mod snowflake;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{CommitMode, Database};

use sc_core::{DatabaseConfig, DbType};
use std::sync::Arc;

/// Open the backend selected by `config.db_type`
pub fn connect(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    match config.db_type {
        DbType::DuckDb => Ok(Arc::new(DuckDbBackend::new(&config.path)?)),
        DbType::Snowflake => Ok(Arc::new(snowflake::SnowflakeBackend::new(&config.path)?)),
    }
}
