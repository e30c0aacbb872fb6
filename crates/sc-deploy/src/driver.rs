//! Reconcile discovered change scripts against the change history and apply
//! the pending ones in version order.

use crate::error::{DeployError, DeployResult};
use crate::ledger::{ChangeHistory, ChangeHistoryEntry};
use sc_core::{
    compare_versions, compute_checksum, max_version, scan_scripts, sort_by_version,
    ChangeHistoryTableRef, CoreError, ScriptRecord,
};
use sc_db::{CommitMode, Database};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a deploy run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Root folder searched recursively for change scripts
    pub root_folder: PathBuf,
    /// Where the change history lives
    pub change_history_table: ChangeHistoryTableRef,
    /// Commit mode for every database call of the run
    pub mode: CommitMode,
    /// Recorded in `INSTALLED_BY`
    pub installed_by: String,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOutcome {
    pub applied: usize,
    pub skipped: usize,
}

/// Progress callbacks for a deploy run.
///
/// All methods default to doing nothing.
pub trait DeployHooks {
    /// The change history table exists and is about to be read
    fn on_change_history_ready(&self, _table: &ChangeHistoryTableRef) {}

    /// Baseline computed from the change history; empty when nothing has
    /// been applied yet
    fn on_baseline(&self, _baseline: &str, _history: &[String]) {}

    /// Script is at or below the baseline
    fn on_skip(&self, _script: &ScriptRecord, _baseline: &str) {}

    /// Script is about to be applied
    fn on_apply(&self, _script: &ScriptRecord) {}

    /// Script was applied and recorded
    fn on_applied(&self, _script: &ScriptRecord, _entry: &ChangeHistoryEntry) {}
}

/// Hooks that ignore every event
pub struct NoopHooks;

impl DeployHooks for NoopHooks {}

/// Runs one deploy against a database
pub struct Deployer {
    db: Arc<dyn Database>,
    config: DeployConfig,
}

impl Deployer {
    pub fn new(db: Arc<dyn Database>, config: DeployConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Run the deploy: bootstrap the change history, compute the baseline,
    /// discover and sort scripts, then apply every script newer than the
    /// baseline.
    ///
    /// Stops at the first error. Scripts recorded before the error stay
    /// recorded, so the next run resumes after them.
    pub async fn run(&self, hooks: &dyn DeployHooks) -> DeployResult<DeployOutcome> {
        let root = &self.config.root_folder;
        if !root.is_dir() {
            return Err(CoreError::InvalidRoot {
                path: root.display().to_string(),
            }
            .into());
        }

        let ledger = ChangeHistory::new(
            Arc::clone(&self.db),
            self.config.change_history_table.clone(),
            self.config.mode,
        );
        ledger.ensure_table_exists().await?;
        hooks.on_change_history_ready(ledger.table());

        let history = ledger.fetch_applied_versions().await?;
        let baseline = max_version(history.iter().map(String::as_str))
            .unwrap_or_default()
            .to_string();
        hooks.on_baseline(&baseline, &history);

        let mut scripts: Vec<ScriptRecord> = scan_scripts(root)?.into_values().collect();
        sort_by_version(&mut scripts, |s| s.version.as_str());

        let mut outcome = DeployOutcome::default();

        for script in &scripts {
            if compare_versions(&script.version, &baseline) != Ordering::Greater {
                log::debug!(
                    "Skipping change script {} because it's older than the most recently applied change ({})",
                    script.name,
                    baseline
                );
                hooks.on_skip(script, &baseline);
                outcome.skipped += 1;
                continue;
            }

            hooks.on_apply(script);
            let entry = self.apply_script(&ledger, script).await?;
            log::info!(
                "Applied change script {} in {}s",
                script.name,
                entry.execution_time_secs
            );
            hooks.on_applied(script, &entry);
            outcome.applied += 1;
        }

        Ok(outcome)
    }

    /// Execute one script and append its change history row
    async fn apply_script(
        &self,
        ledger: &ChangeHistory,
        script: &ScriptRecord,
    ) -> DeployResult<ChangeHistoryEntry> {
        let content = script.read_content()?;
        let checksum = compute_checksum(&content);

        let mut execution_time_secs = 0;
        if !content.is_empty() {
            log::debug!("SQL query: {}", content);
            let start = Instant::now();
            self.db
                .execute_batch(&content, self.config.mode)
                .await
                .map_err(|source| DeployError::Apply {
                    script: script.name.clone(),
                    source,
                })?;
            execution_time_secs = round_secs(start.elapsed());
        }

        let entry = ChangeHistoryEntry::success(
            script,
            checksum,
            execution_time_secs,
            &self.config.installed_by,
        );
        ledger.append(&entry).await?;
        Ok(entry)
    }
}

/// Whole seconds, rounded to nearest
pub(crate) fn round_secs(elapsed: Duration) -> i64 {
    elapsed.as_secs_f64().round() as i64
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
