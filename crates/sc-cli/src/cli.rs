//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// snowchange - apply versioned SQL change scripts to a database
#[derive(Parser, Debug)]
#[command(name = "snowchange")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override config file path (default: snowchange.yml in the root folder)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Named target from the config file (default: $SNOWCHANGE_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending change scripts
    Deploy(DeployArgs),
}

/// Arguments for the deploy command
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Root folder searched recursively for change scripts
    #[arg(short = 'f', long, default_value = ".")]
    pub root_folder: String,

    /// Database change scripts run in
    #[arg(short, long)]
    pub database: Option<String>,

    /// Schema change scripts run in
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Change history table, as [[database.]schema.]table
    /// (default: METADATA.SNOWCHANGE.CHANGE_HISTORY)
    #[arg(short = 'c', long)]
    pub change_history_table: Option<String>,

    /// Commit every statement on its own instead of wrapping each call in a
    /// transaction
    #[arg(long)]
    pub autocommit: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
