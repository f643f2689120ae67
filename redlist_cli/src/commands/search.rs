use anyhow::Result;
use clap::Args;
use redlist_lib::{search, CachedClient};

use crate::output::{
    print_chart_data, print_json, print_species_csv, print_species_markdown, print_species_table,
    OutputFormat,
};

#[derive(Args)]
pub struct SearchArgs {
    /// Scientific name to look up (e.g. "Panthera leo"). Omit to list species.
    #[arg(long)]
    pub name: Option<String>,

    /// Filter the listing by conservation status (e.g. "Endangered")
    #[arg(long)]
    pub status: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: usize,
}

pub async fn run(args: &SearchArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let outcome = search(
        client,
        args.name.as_deref(),
        args.status.as_deref(),
        args.page,
    )
    .await?;

    eprintln!("Page {}/{}", args.page, outcome.total_pages);

    if let OutputFormat::Json = format {
        print_json(&outcome);
        return Ok(());
    }

    if outcome.records.is_empty() {
        println!("{}", outcome.display_text);
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_species_table(&outcome.records),
        OutputFormat::Csv => print_species_csv(&outcome.records)?,
        OutputFormat::Markdown => print_species_markdown(&outcome.records),
        OutputFormat::Json => {}
    }

    if let Some(chart) = &outcome.chart_data {
        print_chart_data(chart, format)?;
    }

    Ok(())
}
