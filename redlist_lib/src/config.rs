//! Process configuration read from the environment (and `.env`).

use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::RedListError;
use crate::rate_limiter::{DEFAULT_MAX_REQUESTS, DEFAULT_PERIOD};

/// Environment variable holding the Red List API token.
pub const API_KEY_VAR: &str = "IUCN_API_KEY";

/// Settings for the client pipeline. Only the API key is required.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub max_requests: usize,
    pub rate_period: Duration,
    pub cache_capacity: usize,
    pub timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// A missing or blank `IUCN_API_KEY` is an error: the program must not
    /// start without a token.
    pub fn from_env() -> Result<Self, RedListError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RedListError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                RedListError::Config(format!("{} is not set", API_KEY_VAR))
            })?;

        Ok(Self {
            api_key,
            base_url: lookup("IUCN_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| redlist_api::DEFAULT_BASE_URL.to_string()),
            max_requests: parse_or(&lookup, "IUCN_RATE_LIMIT", DEFAULT_MAX_REQUESTS),
            rate_period: Duration::from_millis(parse_nonzero_or(
                &lookup,
                "IUCN_RATE_WINDOW_MS",
                DEFAULT_PERIOD.as_millis() as u64,
            )),
            cache_capacity: parse_or(&lookup, "IUCN_CACHE_SIZE", DEFAULT_CAPACITY),
            timeout: Duration::from_secs(parse_nonzero_or(
                &lookup,
                "IUCN_TIMEOUT_SECS",
                redlist_api::DEFAULT_TIMEOUT.as_secs(),
            )),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`parse_or`], but a zero is treated as unusable. A zero window turns
/// throttling off and a zero timeout fails every request.
fn parse_nonzero_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default) {
        0 => {
            tracing::warn!("{} must be greater than 0, using {}", key, default);
            default
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(RedListError::Config(_))));
    }

    #[test]
    fn blank_api_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")]));
        assert!(matches!(result, Err(RedListError::Config(_))));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, redlist_api::DEFAULT_BASE_URL);
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.rate_period, Duration::from_secs(1));
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_apply_and_bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "abc"),
            ("IUCN_API_URL", "http://localhost:8080/"),
            ("IUCN_RATE_LIMIT", "5"),
            ("IUCN_RATE_WINDOW_MS", "250"),
            ("IUCN_CACHE_SIZE", "many"),
            ("IUCN_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.rate_period, Duration::from_millis(250));
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_window_and_timeout_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "abc"),
            ("IUCN_RATE_WINDOW_MS", "0"),
            ("IUCN_TIMEOUT_SECS", " 0 "),
        ]))
        .unwrap();
        assert_eq!(config.rate_period, DEFAULT_PERIOD);
        assert_eq!(config.timeout, redlist_api::DEFAULT_TIMEOUT);
    }
}
