//! sc-core - Core library for snowchange
//!
//! This crate provides change script discovery, the alphanumeric version
//! ordering, change history table resolution, checksums, and configuration
//! parsing shared by the other snowchange crates.

pub mod checksum;
pub mod config;
pub mod error;
pub mod script;
pub mod sql_utils;
pub mod table_ref;
pub mod version;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, DbType, ResolvedConfig, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use script::{scan_scripts, trim_script, ScriptRecord, ScriptType};
pub use table_ref::ChangeHistoryTableRef;
pub use version::{compare_versions, max_version, sort_by_version, VersionKey};
