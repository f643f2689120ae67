//! Wire types for the Red List endpoints that return lists.
//!
//! Single-species lookups are handled as raw JSON by the mapper in
//! `redlist_lib`, which needs to tolerate any missing field.

use serde::{Deserialize, Serialize};

/// Common response envelope: every endpoint wraps its payload in `result`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResultEnvelope<T> {
    /// Species name echoed back by per-species endpoints.
    #[serde(default)]
    pub name: Option<String>,
    /// Total count, present on paged listings.
    #[serde(default)]
    pub count: Option<i64>,
    /// Page number, sent by the API as a string on paged listings.
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// One row of the `species/page/{n}` listing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpeciesListItem {
    #[serde(default)]
    pub taxonid: Option<i64>,
    pub scientific_name: String,
    /// Red List category code, e.g. `EN`.
    #[serde(default)]
    pub category: Option<String>,
}

/// One row of the threats or conservation-measures narrative endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NarrativeItem {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
