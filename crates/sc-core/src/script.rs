//! Change script discovery.
//!
//! Change scripts follow the `V<version>__<description>.sql` naming
//! convention and may live anywhere beneath the root folder.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static SCRIPT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn script_name_re() -> &'static Regex {
    SCRIPT_NAME_RE
        .get_or_init(|| Regex::new(r"^([V])(.+)__(.+)\.sql$").expect("valid regex literal"))
}

/// Kind of change script, taken from the first character of the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// `V` - applied once, in version order
    Versioned,
}

impl ScriptType {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "V" => Some(ScriptType::Versioned),
            _ => None,
        }
    }

    /// Single-character tag stored in the change history table
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::Versioned => "V",
        }
    }
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered change script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRecord {
    /// File name, e.g. `V1.2__add_orders.sql`
    pub name: String,

    /// Location of the file, used to read its content
    pub full_path: PathBuf,

    /// Script type tag
    pub script_type: ScriptType,

    /// Version token between the type tag and `__`
    pub version: String,

    /// Human-readable description derived from the file name
    pub description: String,
}

impl ScriptRecord {
    /// Parse a file name into a script record.
    ///
    /// Returns `None` for files that do not follow the change script naming
    /// convention.
    pub fn from_file_name(file_name: &str, full_path: PathBuf) -> Option<Self> {
        let caps = script_name_re().captures(file_name.trim())?;
        let script_type = ScriptType::from_tag(&caps[1])?;

        Some(Self {
            name: file_name.to_string(),
            full_path,
            script_type,
            version: caps[2].to_string(),
            description: describe(&caps[3]),
        })
    }

    /// Read the script and return the SQL to execute.
    ///
    /// See [`trim_script`] for the normalization applied.
    pub fn read_content(&self) -> CoreResult<String> {
        let raw = std::fs::read_to_string(&self.full_path).map_err(|e| CoreError::IoWithPath {
            path: self.full_path.display().to_string(),
            source: e,
        })?;
        Ok(trim_script(&raw).to_string())
    }
}

/// Turn the description part of a file name into display text.
///
/// Underscores become spaces, the first character is uppercased and the rest
/// lowercased.
pub fn describe(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Strip surrounding whitespace and at most one trailing `;`.
pub fn trim_script(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(';').unwrap_or(trimmed)
}

/// Discover every change script beneath `root`, keyed by file name.
///
/// Fails if `root` is not a directory, or as soon as two scripts share a
/// version.
pub fn scan_scripts(root: &Path) -> CoreResult<BTreeMap<String, ScriptRecord>> {
    if !root.is_dir() {
        return Err(CoreError::InvalidRoot {
            path: root.display().to_string(),
        });
    }

    let mut scripts = BTreeMap::new();
    let mut versions = HashSet::new();
    scan_recursive(root, &mut scripts, &mut versions)?;
    Ok(scripts)
}

/// Recursively discover change scripts in a directory
fn scan_recursive(
    dir: &Path,
    scripts: &mut BTreeMap<String, ScriptRecord>,
    versions: &mut HashSet<String>,
) -> CoreResult<()> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        // Symlinked directories are not descended into
        if file_type.is_dir() {
            scan_recursive(&path, scripts, versions)?;
            continue;
        }
        if file_type.is_symlink() && path.is_dir() {
            log::debug!("Ignoring symlinked directory {}", path.display());
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Ignoring non-UTF-8 file name {}", path.display());
            continue;
        };

        let Some(script) = ScriptRecord::from_file_name(file_name, path.clone()) else {
            log::debug!("Ignoring non-change file {}", path.display());
            continue;
        };

        if versions.contains(&script.version) {
            return Err(CoreError::DuplicateVersion {
                version: script.version,
                path: path.display().to_string(),
            });
        }

        versions.insert(script.version.clone());
        scripts.insert(script.name.clone(), script);
    }

    Ok(())
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
