use std::process::ExitCode;

use clap::Parser;

mod cli;
mod config;
mod db;
mod users;

use crate::cli::{commands, prompt::Prompter, Cli};
use crate::config::DbConfig;
use crate::users::UserRecordStore;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "userstore=debug"
    } else {
        "userstore=warn"
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout belongs to prompts and results
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DbConfig::resolve(cli.database_url.as_deref())?;
    let store = UserRecordStore::new(config);
    tracing::debug!(url = %store.config().redacted_url(), command = ?cli.command, "starting");

    let mut io = Prompter::new(std::io::stdin().lock(), std::io::stdout());
    let outcome = commands::run(cli.command, &store, &mut io).await?;
    Ok(outcome.into())
}
