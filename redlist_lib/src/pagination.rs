//! Page slicing and status filtering over a list of species names.

use serde::Serialize;

use crate::client::{CachedClient, Transport};
use crate::error::RedListError;
use crate::species::{fetch_species, SpeciesRecord};

/// Page size used by the listing view.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of resolved species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items: Vec<SpeciesRecord>,
    /// Page count of the unfiltered list, at least 1.
    pub total_pages: usize,
}

/// `ceil(total / page_size)`, never less than 1. `page_size` must be > 0.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// The `[(page-1)*page_size, page*page_size)` window of `items`, clamped to
/// its bounds. Pages past the end (and page 0) give an empty slice.
pub fn page_window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Resolves the species on `page` and keeps those matching `status_filter`.
///
/// Names are resolved one after another through the cached client; names
/// that do not resolve are dropped. The filter is an exact, case-sensitive
/// match on the category label. `total_pages` counts the unfiltered list, so
/// a filtered page can be empty while later pages are not.
pub async fn paginate_and_filter<T, S>(
    client: &CachedClient<T>,
    all_items: &[S],
    status_filter: Option<&str>,
    page: usize,
    page_size: usize,
) -> Result<PageResult, RedListError>
where
    T: Transport,
    S: AsRef<str>,
{
    if page == 0 {
        return Err(RedListError::InvalidInput("page must be at least 1".to_string()));
    }
    if page_size == 0 {
        return Err(RedListError::InvalidInput(
            "page size must be greater than 0".to_string(),
        ));
    }

    let mut items = Vec::new();
    for name in page_window(all_items, page, page_size) {
        let name = name.as_ref();
        let Some(record) = fetch_species(client, name).await else {
            tracing::warn!("Dropping {} from page {}: species did not resolve", name, page);
            continue;
        };
        if status_filter.is_some_and(|status| record.category() != status) {
            continue;
        }
        items.push(record);
    }

    Ok(PageResult {
        items,
        total_pages: total_pages(all_items.len(), page_size),
    })
}
