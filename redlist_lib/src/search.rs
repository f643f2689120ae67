//! The boundary used by presentation code: one call per search form submit.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::client::{CachedClient, Transport};
use crate::error::RedListError;
use crate::pagination::{paginate_and_filter, DEFAULT_PAGE_SIZE};
use crate::species::{fetch_species, fetch_species_universe, SpeciesRecord};
use crate::validation;

pub const SPECIES_NOT_FOUND: &str = "Species not found or error fetching data.";
pub const NO_SPECIES_FOUND: &str = "No species found or invalid input.";

/// Listing page of the API used as the universe for unnamed searches.
pub const UNIVERSE_PAGE: u32 = 0;

/// Label → count tables behind the status pie chart and the trend bar chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub status_counts: BTreeMap<String, usize>,
    pub trend_counts: BTreeMap<String, usize>,
}

/// Everything the presentation layer needs to render one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Markdown text for the results panel.
    pub display_text: String,
    pub chart_data: Option<ChartData>,
    pub total_pages: usize,
    /// Records behind the text, for structured output.
    pub records: Vec<SpeciesRecord>,
}

impl SearchOutcome {
    fn empty(display_text: &str, total_pages: usize) -> Self {
        Self {
            display_text: display_text.to_string(),
            chart_data: None,
            total_pages,
            records: Vec::new(),
        }
    }
}

/// Counts categories and population trends over `records`.
pub fn build_chart_data(records: &[SpeciesRecord]) -> ChartData {
    let mut data = ChartData::default();
    for record in records {
        *data
            .status_counts
            .entry(record.category().to_string())
            .or_insert(0) += 1;
        *data
            .trend_counts
            .entry(record.population_trend().to_string())
            .or_insert(0) += 1;
    }
    data
}

/// Runs a search.
///
/// With a species name, looks that species up (the status filter does not
/// apply). Without one, lists page `page` of the species universe at
/// [`DEFAULT_PAGE_SIZE`], filtered by `status_filter`.
pub async fn search<T: Transport>(
    client: &CachedClient<T>,
    species_name: Option<&str>,
    status_filter: Option<&str>,
    page: usize,
) -> Result<SearchOutcome, RedListError> {
    let page = validation::validate_page(page)?;
    let status_filter = status_filter
        .filter(|s| !s.trim().is_empty())
        .map(validation::validate_status)
        .transpose()?;

    match species_name.filter(|s| !s.trim().is_empty()) {
        Some(name) => {
            let name = validation::validate_species_name(name)?;
            Ok(lookup(client, &name).await)
        }
        None => {
            let universe = fetch_species_universe(client, UNIVERSE_PAGE).await;
            search_page(client, &universe, status_filter.as_deref(), page, DEFAULT_PAGE_SIZE)
                .await
        }
    }
}

/// Lists one page of `universe` with the same text and chart output as
/// [`search`].
pub async fn search_page<T, S>(
    client: &CachedClient<T>,
    universe: &[S],
    status_filter: Option<&str>,
    page: usize,
    page_size: usize,
) -> Result<SearchOutcome, RedListError>
where
    T: Transport,
    S: AsRef<str>,
{
    let result = paginate_and_filter(client, universe, status_filter, page, page_size).await?;
    if result.items.is_empty() {
        return Ok(SearchOutcome::empty(NO_SPECIES_FOUND, result.total_pages));
    }

    Ok(SearchOutcome {
        display_text: format_listing(&result.items, page, result.total_pages),
        chart_data: Some(build_chart_data(&result.items)),
        total_pages: result.total_pages,
        records: result.items,
    })
}

async fn lookup<T: Transport>(client: &CachedClient<T>, name: &str) -> SearchOutcome {
    match fetch_species(client, name).await {
        Some(record) => SearchOutcome {
            display_text: format_species(&record),
            chart_data: Some(build_chart_data(std::slice::from_ref(&record))),
            total_pages: 1,
            records: vec![record],
        },
        None => SearchOutcome::empty(SPECIES_NOT_FOUND, 1),
    }
}

/// Markdown block describing one species.
pub fn format_species(record: &SpeciesRecord) -> String {
    let mut out = String::from("### Species Information:\n");
    let _ = writeln!(out, "- **Scientific Name:** {}", record.scientific_name());
    let _ = writeln!(out, "- **Common Name:** {}", record.common_name());
    let _ = writeln!(out, "- **Conservation Status:** {}", record.category());
    let _ = writeln!(out, "- **Population Trend:** {}", record.population_trend());
    let _ = writeln!(out, "- **Habitat:** {}", record.habitat());
    let _ = writeln!(out, "- **Threats:** {}", record.threats());
    let _ = writeln!(
        out,
        "- **Conservation Measures:** {}",
        record.conservation_measures()
    );
    out
}

fn format_listing(records: &[SpeciesRecord], page: usize, total_pages: usize) -> String {
    let mut out = format!("### Species (page {} of {}):\n", page, total_pages);
    for record in records {
        let _ = writeln!(
            out,
            "- **{}** ({}): {}, trend {}",
            record.scientific_name(),
            record.common_name(),
            record.category(),
            record.population_trend()
        );
    }
    out
}
