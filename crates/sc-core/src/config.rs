//! Configuration types and parsing for snowchange.yml

use crate::error::{CoreError, CoreResult};
use crate::table_ref::ChangeHistoryTableRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the target to deploy to
pub const TARGET_ENV_VAR: &str = "SNOWCHANGE_TARGET";

/// Environment variable naming the user recorded in `INSTALLED_BY`
pub const USER_ENV_VAR: &str = "SNOWCHANGE_USER";

const CONFIG_FILE_NAMES: [&str; 2] = ["snowchange.yml", "snowchange.yaml"];

/// Project configuration from snowchange.yml
///
/// Every field is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema scripts run in (combined with `database.name`)
    #[serde(default)]
    pub schema: Option<String>,

    /// Override for the change history table (`[[database.]schema.]table`)
    #[serde(default)]
    pub change_history_table: Option<String>,

    /// Run every statement in its own committed unit
    #[serde(default)]
    pub autocommit: bool,

    /// Value recorded in the `INSTALLED_BY` column
    #[serde(default)]
    pub installed_by: Option<String>,

    /// Named target configurations (e.g., test, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Schema override
    #[serde(default)]
    pub schema: Option<String>,

    /// Change history table override
    #[serde(default)]
    pub change_history_table: Option<String>,

    /// Autocommit override
    #[serde(default)]
    pub autocommit: Option<bool>,

    /// `INSTALLED_BY` override
    #[serde(default)]
    pub installed_by: Option<String>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// Snowflake
    Snowflake,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Snowflake => write!(f, "snowflake"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or snowflake)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Connection string: a file path or `:memory:` for DuckDB, an account
    /// URL for Snowflake
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Database scripts run in; the connection default when unset
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            name: None,
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

/// Configuration after target overrides have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub database: DatabaseConfig,
    pub schema: Option<String>,
    pub change_history_table: Option<String>,
    pub autocommit: bool,
    pub installed_by: Option<String>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Locate snowchange.yml or snowchange.yaml in `dir`
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Load the configuration file in `dir`, or the default configuration
    /// when the directory has none
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        Self::validate_database(&self.database)?;
        Self::validate_table_override(self.change_history_table.as_deref())?;

        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                Self::validate_database(db).map_err(|e| CoreError::ConfigInvalid {
                    message: format!("target '{}': {}", name, e),
                })?;
            }
            Self::validate_table_override(target.change_history_table.as_deref()).map_err(
                |e| CoreError::ConfigInvalid {
                    message: format!("target '{}': {}", name, e),
                },
            )?;
        }

        Ok(())
    }

    fn validate_database(db: &DatabaseConfig) -> CoreResult<()> {
        if db.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    fn validate_table_override(name: Option<&str>) -> CoreResult<()> {
        ChangeHistoryTableRef::resolve(name).map(|_| ())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Apply the overrides of `target`, if any, on top of the base config.
    ///
    /// Fails when `target` names a target that is not defined.
    pub fn resolve(&self, target: Option<&str>) -> CoreResult<ResolvedConfig> {
        let base = ResolvedConfig {
            database: self.database.clone(),
            schema: self.schema.clone(),
            change_history_table: self.change_history_table.clone(),
            autocommit: self.autocommit,
            installed_by: self.installed_by.clone(),
        };

        let Some(name) = target else {
            return Ok(base);
        };

        let tc = self
            .targets
            .get(name)
            .ok_or_else(|| CoreError::TargetNotFound {
                name: name.to_string(),
                available: self.available_targets().join(", "),
            })?;

        Ok(ResolvedConfig {
            database: tc.database.clone().unwrap_or(base.database),
            schema: tc.schema.clone().or(base.schema),
            change_history_table: tc
                .change_history_table
                .clone()
                .or(base.change_history_table),
            autocommit: tc.autocommit.unwrap_or(base.autocommit),
            installed_by: tc.installed_by.clone().or(base.installed_by),
        })
    }

    /// Resolve target from CLI flag or SNOWCHANGE_TARGET environment variable
    ///
    /// Priority: CLI flag > SNOWCHANGE_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }

    /// Resolve the installing user from config or SNOWCHANGE_USER
    ///
    /// Priority: configured value > SNOWCHANGE_USER env var > None
    pub fn resolve_installed_by(configured: Option<&str>) -> Option<String> {
        configured
            .map(String::from)
            .or_else(|| std::env::var(USER_ENV_VAR).ok())
            .filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
