//! Deploy command implementation

use anyhow::{Context, Result};
use sc_core::{ChangeHistoryTableRef, Config, CoreError, ResolvedConfig, ScriptRecord};
use sc_db::CommitMode;
use sc_deploy::{ChangeHistoryEntry, DeployConfig, DeployHooks, Deployer};
use std::path::{Path, PathBuf};

use crate::cli::{DeployArgs, GlobalArgs};

/// Recorded in `INSTALLED_BY` when no user can be determined
const UNKNOWN_USER: &str = "unknown";

/// Settings for one run after config, target, and CLI flags are merged
#[derive(Debug)]
struct RunSettings {
    deploy: DeployConfig,
    /// Session database, from `-d` or `database.name`
    database: Option<String>,
    /// Session schema, from `-s` or `schema`
    schema: Option<String>,
}

/// Execute the deploy command
pub async fn execute(args: &DeployArgs, global: &GlobalArgs) -> Result<()> {
    let root = absolute_root(&args.root_folder)?;

    println!("snowchange version: {}", env!("CARGO_PKG_VERSION"));
    println!("Using root folder {}", root.display());

    // Fail before connecting so a bad root never creates a database file
    if !root.is_dir() {
        return Err(CoreError::InvalidRoot {
            path: root.display().to_string(),
        }
        .into());
    }

    let config = load_config(global.config.as_deref(), &root)?;
    let target = Config::resolve_target(global.target.as_deref());
    if global.verbose {
        if let Some(name) = &target {
            eprintln!("[verbose] Using target: {}", name);
        }
    }
    let resolved = config
        .resolve(target.as_deref())
        .context("Failed to resolve target")?;

    let db_config = resolved.database.clone();
    let settings = build_settings(args, resolved, root, os_user())?;
    log::debug!("Deploy settings: {:?}", settings);

    if global.verbose {
        eprintln!(
            "[verbose] Connecting to {} database: {}",
            db_config.db_type, db_config.path
        );
        eprintln!("[verbose] Commit mode: {}", settings.deploy.mode);
        eprintln!("[verbose] Installed by: {}", settings.deploy.installed_by);
    }

    let db = sc_db::connect(&db_config).context("Failed to connect to database")?;

    if settings.database.is_some() || settings.schema.is_some() {
        db.use_namespace(settings.database.as_deref(), settings.schema.as_deref())
            .await
            .context("Failed to switch session database/schema")?;
        if global.verbose {
            eprintln!(
                "[verbose] Session namespace: {}",
                namespace_label(settings.database.as_deref(), settings.schema.as_deref())
            );
        }
    }

    let hooks = ConsoleHooks {
        verbose: global.verbose,
    };
    let deployer = Deployer::new(db, settings.deploy);
    let outcome = deployer.run(&hooks).await.context("Deploy failed")?;

    println!(
        "Successfully applied {} change scripts (skipping {})",
        outcome.applied, outcome.skipped
    );
    println!("Completed successfully");
    Ok(())
}

/// Absolute form of the root folder argument
fn absolute_root(root_folder: &str) -> Result<PathBuf> {
    let path = Path::new(root_folder);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Explicit `--config` path, else snowchange.yml in the root folder, else
/// the built-in defaults
fn load_config(explicit: Option<&str>, root: &Path) -> Result<Config> {
    match explicit {
        Some(path) => {
            log::debug!("Loading configuration from {}", path);
            Config::load(Path::new(path)).with_context(|| format!("Failed to load {}", path))
        }
        None => {
            match Config::find_in_dir(root) {
                Some(path) => log::debug!("Loading configuration from {}", path.display()),
                None => log::debug!("No configuration file in {}, using defaults", root.display()),
            }
            Config::load_from_dir(root).context("Failed to load configuration")
        }
    }
}

/// Merge CLI flags over the resolved configuration.
///
/// Flags win over the target, which wins over the base config.
fn build_settings(
    args: &DeployArgs,
    resolved: ResolvedConfig,
    root: PathBuf,
    os_user: Option<String>,
) -> Result<RunSettings> {
    let table_override = args
        .change_history_table
        .as_deref()
        .or(resolved.change_history_table.as_deref());
    let change_history_table = ChangeHistoryTableRef::resolve(table_override)
        .context("Invalid change history table")?;

    let installed_by = Config::resolve_installed_by(resolved.installed_by.as_deref())
        .or(os_user)
        .unwrap_or_else(|| UNKNOWN_USER.to_string());

    Ok(RunSettings {
        deploy: DeployConfig {
            root_folder: root,
            change_history_table,
            mode: CommitMode::from_autocommit(args.autocommit || resolved.autocommit),
            installed_by,
        },
        database: args.database.clone().or(resolved.database.name),
        schema: args.schema.clone().or(resolved.schema),
    })
}

/// Login name from `USER` or `USERNAME`
fn os_user() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|user| !user.is_empty())
}

fn namespace_label(database: Option<&str>, schema: Option<&str>) -> String {
    match (database, schema) {
        (Some(db), Some(schema)) => format!("{}.{}", db, schema),
        (Some(db), None) => db.to_string(),
        (None, Some(schema)) => schema.to_string(),
        (None, None) => String::new(),
    }
}

/// Prints deploy progress to the terminal
struct ConsoleHooks {
    verbose: bool,
}

impl DeployHooks for ConsoleHooks {
    fn on_change_history_ready(&self, table: &ChangeHistoryTableRef) {
        println!("Using change history table {}", table);
    }

    fn on_baseline(&self, baseline: &str, history: &[String]) {
        if self.verbose {
            eprintln!("[verbose] Change history versions: {:?}", history);
        }
        let shown = if baseline.is_empty() { "None" } else { baseline };
        println!("Max applied change script version: {}", shown);
    }

    fn on_skip(&self, script: &ScriptRecord, baseline: &str) {
        if self.verbose {
            eprintln!(
                "[verbose] Skipping change script {} because it's older than the most recently applied change ({})",
                script.name, baseline
            );
        }
    }

    fn on_apply(&self, script: &ScriptRecord) {
        println!("Applying change script {}", script.name);
    }

    fn on_applied(&self, script: &ScriptRecord, entry: &ChangeHistoryEntry) {
        if self.verbose {
            eprintln!(
                "[verbose] Recorded {} (checksum {}, {}s)",
                script.name, entry.checksum, entry.execution_time_secs
            );
        }
    }
}

#[cfg(test)]
#[path = "deploy_test.rs"]
mod tests;
