//! Normalized species records and the mapping from raw API JSON.

use redlist_api::types::{NarrativeItem, ResultEnvelope, SpeciesListItem};
use redlist_api::RequestKey;
use serde::Serialize;
use serde_json::Value;

use crate::client::{CachedClient, Transport};

/// Placeholder for any optional field the API did not provide.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Red List category codes and their labels.
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("EX", "Extinct"),
    ("EW", "Extinct in the Wild"),
    ("CR", "Critically Endangered"),
    ("EN", "Endangered"),
    ("VU", "Vulnerable"),
    ("NT", "Near Threatened"),
    ("LC", "Least Concern"),
    ("DD", "Data Deficient"),
    ("NE", "Not Evaluated"),
    ("LR/cd", "Lower Risk/conservation dependent"),
    ("LR/nt", "Lower Risk/near threatened"),
    ("LR/lc", "Lower Risk/least concern"),
];

/// Conservation attributes of one species. Identity is the scientific name.
///
/// Records are only built by [`map_species`] (and enriched by
/// [`fetch_species`]); the fields are read-only from outside this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesRecord {
    scientific_name: String,
    common_name: String,
    category: String,
    population_trend: String,
    habitat: String,
    threats: String,
    conservation_measures: String,
}

impl SpeciesRecord {
    pub fn scientific_name(&self) -> &str {
        &self.scientific_name
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// Full category label, e.g. `Endangered`.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn population_trend(&self) -> &str {
        &self.population_trend
    }

    pub fn habitat(&self) -> &str {
        &self.habitat
    }

    pub fn threats(&self) -> &str {
        &self.threats
    }

    pub fn conservation_measures(&self) -> &str {
        &self.conservation_measures
    }
}

/// Maps a `species/{name}` response to a record.
///
/// Returns `None` ("not found") when there is no response, no `result`
/// array, an empty one, or a first entry without a `scientific_name`.
/// Every other field falls back to [`NOT_AVAILABLE`].
pub fn map_species(response: Option<&Value>) -> Option<SpeciesRecord> {
    let info = response?.get("result")?.as_array()?.first()?;
    let scientific_name = non_empty_str(info.get("scientific_name"))?.to_string();

    Some(SpeciesRecord {
        scientific_name,
        common_name: text_field(info, &["main_common_name"]),
        category: normalize_category(&text_field(info, &["category"])),
        population_trend: text_field(info, &["population_trend", "populationtrend"]),
        habitat: text_field(info, &["habitat"]),
        threats: NOT_AVAILABLE.to_string(),
        conservation_measures: NOT_AVAILABLE.to_string(),
    })
}

/// Expands a category code to its label. Labels and unknown values are
/// returned unchanged.
pub fn normalize_category(raw: &str) -> String {
    CATEGORY_LABELS
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Looks up one species and enriches it with the threats and
/// conservation-measures narratives.
///
/// A failed or empty narrative leaves its field at [`NOT_AVAILABLE`]; the
/// narratives are not requested when the species itself was not found.
pub async fn fetch_species<T: Transport>(
    client: &CachedClient<T>,
    name: &str,
) -> Option<SpeciesRecord> {
    let response = client
        .call_key(&RequestKey::from_segments(["species", name]))
        .await;
    let record = map_species(response.as_ref())?;

    let threats = client
        .call_key(&RequestKey::from_segments([
            "threats",
            "species",
            "name",
            record.scientific_name.as_str(),
        ]))
        .await;
    let measures = client
        .call_key(&RequestKey::from_segments([
            "measures",
            "species",
            "name",
            record.scientific_name.as_str(),
        ]))
        .await;

    Some(SpeciesRecord {
        threats: narrative_text(threats.as_ref()).unwrap_or(record.threats),
        conservation_measures: narrative_text(measures.as_ref())
            .unwrap_or(record.conservation_measures),
        ..record
    })
}

/// Fetches one page of the species listing and returns the scientific names
/// in API order. Any failure yields an empty list.
pub async fn fetch_species_universe<T: Transport>(
    client: &CachedClient<T>,
    page: u32,
) -> Vec<String> {
    let Some(response) = client
        .call_key(&RequestKey::from_segments([
            "species".to_string(),
            "page".to_string(),
            page.to_string(),
        ]))
        .await
    else {
        return Vec::new();
    };

    match serde_json::from_value::<ResultEnvelope<SpeciesListItem>>(response) {
        Ok(envelope) => envelope
            .result
            .into_iter()
            .map(|item| item.scientific_name)
            .filter(|name| !name.trim().is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!("Unexpected species listing shape on page {}: {}", page, e);
            Vec::new()
        }
    }
}

/// Joins narrative titles with `"; "`. `None` when there is nothing to show.
fn narrative_text(response: Option<&Value>) -> Option<String> {
    let envelope =
        serde_json::from_value::<ResultEnvelope<NarrativeItem>>(response?.clone()).ok()?;
    let titles: Vec<String> = envelope
        .result
        .into_iter()
        .filter_map(|item| item.title)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .collect();
    if titles.is_empty() {
        None
    } else {
        Some(titles.join("; "))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn text_field(info: &Value, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| non_empty_str(info.get(*name)))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
