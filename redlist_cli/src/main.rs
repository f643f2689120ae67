mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redlist_lib::{CachedClient, Config};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "redlist")]
#[command(about = "Look up species conservation status on the IUCN Red List")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search by species name, or list species filtered by status
    Search(commands::search::SearchArgs),
    /// Show every field of one species
    Species(commands::species::SpeciesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("redlist=info".parse()?)
                .add_directive("redlist_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let config = Config::from_env().context("refusing to start without an API token")?;
    let client = CachedClient::from_config(&config)?;

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &client, &format).await?,
        Commands::Species(args) => commands::species::run(args, &client, &format).await?,
    }

    let summary = client.summary();
    tracing::debug!(
        "{} requests ({} failed), {} cache hits, {:.1}s waiting on the rate limit",
        summary.requests.requests_made,
        summary.requests.requests_failed,
        summary.cache_hits,
        summary.requests.total_wait_secs
    );

    Ok(())
}
