//! Raw HTTP client for the IUCN Red List v3 API.
//!
//! Builds request URLs, injects the API token, enforces a per-request timeout
//! and turns transport, status and JSON failures into a single [`Error`] type.
//! Caching and rate limiting live one layer up, in `redlist_lib`.

mod client;
mod errors;
mod request;
pub mod types;
pub use self::client::{Client, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::errors::Error;
pub use self::request::RequestKey;
