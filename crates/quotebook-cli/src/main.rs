//! Quotebook CLI - keep a categorized quote collection in sync from the terminal.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::{load_config, resolve_data_dir};
use crate::commands::completions::run_completions;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::commands::sync::{run_sync, run_watch};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quotebook=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let config = load_config(cli.remote_url)?;
    let data_dir = resolve_data_dir(cli.data_dir, &config);

    match cli.command {
        Some(Commands::Show { category }) => run_show(category.as_deref(), &data_dir).await?,
        Some(Commands::Add { text, category }) => run_add(&text, &category, &data_dir).await?,
        Some(Commands::List { category, json }) => {
            run_list(category.as_deref(), json, &data_dir).await?;
        }
        Some(Commands::Categories { json }) => run_categories(json, &data_dir).await?,
        Some(Commands::Filter { category }) => run_filter(category.as_deref(), &data_dir).await?,
        Some(Commands::Export { output }) => run_export(&output, &data_dir).await?,
        Some(Commands::Import { path }) => run_import(&path, &data_dir).await?,
        Some(Commands::Sync) => run_sync(&data_dir, &config).await?,
        Some(Commands::Watch { interval, now }) => {
            run_watch(interval, now, &data_dir, config).await?;
        }
        Some(Commands::Completions { .. }) => {}
        // Bare `quotebook` shows a quote from the saved filter.
        None => run_show(None, &data_dir).await?,
    }

    Ok(())
}
