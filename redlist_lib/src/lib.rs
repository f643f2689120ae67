//! Library layer for the Red List tracker: cached and rate-limited API
//! client, species mapping, pagination and the search boundary.
//!
//! Wraps the `redlist_api` crate with a bounded in-memory cache and a
//! rolling-window rate limiter, composed as `CachedClient<RateLimited<Client>>`.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod rate_limiter;
pub mod search;
pub mod species;
pub mod validation;

pub use redlist_api;
pub use redlist_api::RequestKey;

pub use client::{CachedClient, ClientSummary, RateLimited, Transport};
pub use config::Config;
pub use error::RedListError;
pub use pagination::{paginate_and_filter, PageResult, DEFAULT_PAGE_SIZE};
pub use search::{search, search_page, ChartData, SearchOutcome};
pub use species::{fetch_species, map_species, SpeciesRecord, NOT_AVAILABLE};
