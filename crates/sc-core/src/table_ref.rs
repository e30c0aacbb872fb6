//! Location of the change history table.

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::quote_ident;
use std::fmt;

/// Default database holding the change history table
pub const DEFAULT_DATABASE: &str = "METADATA";

/// Default schema holding the change history table
pub const DEFAULT_SCHEMA: &str = "SNOWCHANGE";

/// Default change history table name
pub const DEFAULT_TABLE: &str = "CHANGE_HISTORY";

/// Fully-qualified reference to the change history table.
///
/// All three parts are uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeHistoryTableRef {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl Default for ChangeHistoryTableRef {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl ChangeHistoryTableRef {
    /// Resolve the table reference from an optional one, two or three part
    /// override (`table`, `schema.table` or `database.schema.table`).
    ///
    /// Parts not named by the override keep their defaults.
    ///
    /// # Examples
    /// ```
    /// use sc_core::table_ref::ChangeHistoryTableRef;
    /// let t = ChangeHistoryTableRef::resolve(Some("audit.history")).unwrap();
    /// assert_eq!(t.to_string(), "METADATA.AUDIT.HISTORY");
    /// ```
    pub fn resolve(override_name: Option<&str>) -> CoreResult<Self> {
        let mut table_ref = Self::default();
        let Some(raw) = override_name else {
            return Ok(table_ref);
        };

        let parts: Vec<String> = raw.trim().split('.').map(str::to_uppercase).collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::InvalidTableName {
                name: raw.to_string(),
            });
        }

        match parts.as_slice() {
            [table] => {
                table_ref.table = table.clone();
            }
            [schema, table] => {
                table_ref.schema = schema.clone();
                table_ref.table = table.clone();
            }
            [database, schema, table] => {
                table_ref.database = database.clone();
                table_ref.schema = schema.clone();
                table_ref.table = table.clone();
            }
            _ => {
                return Err(CoreError::InvalidTableName {
                    name: raw.to_string(),
                });
            }
        }

        Ok(table_ref)
    }

    /// Quoted `"DATABASE"."SCHEMA"` for use in SQL
    pub fn quoted_schema(&self) -> String {
        format!("{}.{}", quote_ident(&self.database), quote_ident(&self.schema))
    }

    /// Quoted `"DATABASE"."SCHEMA"."TABLE"` for use in SQL
    pub fn quoted(&self) -> String {
        format!("{}.{}", self.quoted_schema(), quote_ident(&self.table))
    }
}

impl fmt::Display for ChangeHistoryTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}
