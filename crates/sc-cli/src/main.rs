//! snowchange CLI - apply versioned SQL change scripts in order

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::deploy;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Deploy(args) => deploy::execute(args, &cli.global).await,
    }
}

/// `debug` with --verbose, `warn` otherwise; `RUST_LOG` wins when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
