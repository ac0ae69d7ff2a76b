mod cli;
mod commands;
mod i18n;
mod prompt;
mod render;

use std::process::ExitCode;

use clap::Parser;
use services::{AppServices, ClientConfig, Clock};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Context;

rust_i18n::i18n!("locales", fallback = "en");

/// Open the local store, pick the locale and restore the saved session.
async fn bootstrap(cli: &Cli) -> anyhow::Result<Context> {
    let config = ClientConfig::new(&cli.api_url, cli.db.clone(), cli.locale.clone())?;
    tracing::debug!(api = %config.api_base, db = %config.db_url, "configuration");

    let services = AppServices::new_sqlite(&config, Clock::system()).await?;
    i18n::init(
        services.storage().preferences.as_ref(),
        config.locale.as_deref(),
    )
    .await?;
    let session = services.auth().restore().await?;
    Ok(Context { services, session })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = match bootstrap(&cli).await {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = commands::dispatch(cli.command, &ctx).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("{}", commands::describe(&err));
    }
    ExitCode::SUCCESS
}
