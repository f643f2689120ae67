//! Caching and rate-limiting pipeline in front of the raw API client.
//!
//! The pipeline is an explicit composition of two stages,
//! `CachedClient<RateLimited<Client>>`: every stage implements or wraps
//! [`Transport`], so each can be tested on its own against a stub transport.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use redlist_api::{Client, RequestKey};
use serde_json::Value;

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::RedListError;
use crate::rate_limiter::RateLimiter;

/// Anything that can turn a request into a JSON response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, key: &RequestKey) -> Result<Value, redlist_api::Error>;
}

#[async_trait]
impl Transport for Client {
    async fn fetch(&self, key: &RequestKey) -> Result<Value, redlist_api::Error> {
        self.get_json(key).await
    }
}

/// Stage that passes every request through a [`RateLimiter`] first.
pub struct RateLimited<T> {
    inner: T,
    limiter: RateLimiter,
}

impl<T: Transport> RateLimited<T> {
    pub fn new(inner: T, limiter: RateLimiter) -> Self {
        Self { inner, limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for RateLimited<T> {
    async fn fetch(&self, key: &RequestKey) -> Result<Value, redlist_api::Error> {
        self.limiter.acquire().await;
        let result = self.inner.fetch(key).await;
        match &result {
            Ok(_) => self.limiter.tracker().record_success(),
            Err(_) => self.limiter.tracker().record_failure(),
        }
        result
    }
}

/// API client wrapper that memoizes every response, failures included.
///
/// Cache hits return without touching the inner transport. A failed call is
/// logged and cached as `None`, so repeating it does not hit the network
/// again until the entry is evicted or the cache is cleared.
///
/// Concurrent misses on the same key are serialized on a per-key lock: only
/// the first caller fetches, the rest find the entry once it is released.
pub struct CachedClient<T = RateLimited<Client>> {
    inner: T,
    cache: BoundedCache<RequestKey, Option<Value>>,
    in_flight: DashMap<RequestKey, Arc<tokio::sync::Mutex<()>>>,
    hits: AtomicU64,
}

impl CachedClient<RateLimited<Client>> {
    /// Builds the full pipeline from configuration: raw client with the
    /// configured base URL and timeout, rate limiter, bounded cache.
    pub fn from_config(config: &Config) -> Result<Self, RedListError> {
        let client = Client::with_options(&config.base_url, config.api_key.clone(), config.timeout)?;
        let limiter = RateLimiter::new(config.max_requests, config.rate_period);
        Ok(Self::new(
            RateLimited::new(client, limiter),
            BoundedCache::new(config.cache_capacity),
        ))
    }

    /// Snapshot of the pipeline's counters.
    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            cache_hits: self.cache_hits(),
            cache_entries: self.cache.len(),
            requests: self.inner.limiter().tracker().summary(),
        }
    }
}

impl<T: Transport> CachedClient<T> {
    pub fn new(inner: T, cache: BoundedCache<RequestKey, Option<Value>>) -> Self {
        Self {
            inner,
            cache,
            in_flight: DashMap::new(),
            hits: AtomicU64::new(0),
        }
    }

    /// Calls `endpoint` with `params` (the token is added by the raw client).
    ///
    /// Returns `None` when the call failed now or failed earlier and was
    /// cached as a failure.
    pub async fn call(&self, endpoint: &str, params: &BTreeMap<String, String>) -> Option<Value> {
        let key = RequestKey::new(endpoint)
            .with_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        self.call_key(&key).await
    }

    /// Same as [`Self::call`] for an already built key.
    pub async fn call_key(&self, key: &RequestKey) -> Option<Value> {
        if let Some(cached) = self.lookup(key) {
            return cached;
        }

        let gate = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let _guard = gate.lock().await;
        let _release = InFlightRelease {
            in_flight: &self.in_flight,
            key,
        };

        // Another caller may have filled the entry while we waited
        if let Some(cached) = self.lookup(key) {
            return cached;
        }

        let value = match self.inner.fetch(key).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("API call {} failed: {}", key, e);
                None
            }
        };
        self.cache.insert(key.clone(), value.clone());
        value
    }

    fn lookup(&self, key: &RequestKey) -> Option<Option<Value>> {
        let cached = self.cache.get(key)?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache hit for {}", key);
        Some(cached)
    }

    /// Number of calls answered from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of entries currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Removes all entries from the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

/// Drops the per-key lock entry when the holder finishes, including when its
/// future is cancelled mid-fetch.
struct InFlightRelease<'a> {
    in_flight: &'a DashMap<RequestKey, Arc<tokio::sync::Mutex<()>>>,
    key: &'a RequestKey,
}

impl Drop for InFlightRelease<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(self.key);
    }
}

/// Counters for one pipeline, for logging.
#[derive(Debug, Clone)]
pub struct ClientSummary {
    pub cache_hits: u64,
    pub cache_entries: usize,
    pub requests: crate::rate_limiter::TrackerSummary,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory transport answering from a fixed endpoint → JSON table.
    /// Unknown endpoints fail with a 404.
    #[derive(Default)]
    pub struct StubTransport {
        responses: HashMap<String, Value>,
        calls: AtomicUsize,
        seen: Mutex<Vec<RequestKey>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(mut self, endpoint: &str, body: Value) -> Self {
            self.responses.insert(endpoint.to_string(), body);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen(&self) -> Vec<RequestKey> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn fetch(&self, key: &RequestKey) -> Result<Value, redlist_api::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(key.clone());
            self.responses
                .get(&key.endpoint())
                .cloned()
                .ok_or(redlist_api::Error::HttpStatus {
                    status: 404,
                    body: String::new(),
                })
        }
    }

    /// Builds a cached client over a stub, with the given capacity.
    pub fn cached(stub: StubTransport, capacity: usize) -> CachedClient<StubTransport> {
        CachedClient::new(stub, BoundedCache::new(capacity))
    }
}
