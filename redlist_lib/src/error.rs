//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding configuration and input validation failures.
///
/// Failed remote calls are not reported through this type: the cached
/// client absorbs them into a cached `None`.
#[derive(Debug)]
pub enum RedListError {
    /// An error from the underlying API client, e.g. while building it.
    Api(redlist_api::Error),
    /// Required configuration is missing or unusable.
    Config(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for RedListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RedListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<redlist_api::Error> for RedListError {
    fn from(e: redlist_api::Error) -> Self {
        Self::Api(e)
    }
}
