use anyhow::{bail, Result};
use clap::Args;
use redlist_lib::{fetch_species, validation, CachedClient};

use crate::output::{print_json, print_species_detail, OutputFormat};

#[derive(Args)]
pub struct SpeciesArgs {
    /// Scientific name, e.g. "Panthera leo"
    pub name: String,
}

pub async fn run(args: &SpeciesArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let name = validation::validate_species_name(&args.name)?;

    let Some(record) = fetch_species(client, &name).await else {
        bail!("species '{}' not found or error fetching data", name);
    };

    match format {
        OutputFormat::Json => print_json(&record),
        _ => print_species_detail(&record, format)?,
    }

    Ok(())
}
