//! Request signature shared by the raw client and the cache layer.

use std::collections::BTreeMap;
use std::fmt;

/// Name of the query parameter carrying the API token.
pub(crate) const TOKEN_PARAM: &str = "token";

/// An endpoint plus its query parameters, excluding the auth token.
///
/// The endpoint is held as path segments. A segment is sent as one path
/// component even when it contains `/`, so caller-supplied text such as a
/// species name can never reach a different endpoint. Parameters are kept in
/// a `BTreeMap` so equality and hashing do not depend on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    segments: Vec<String>,
    params: BTreeMap<String, String>,
}

impl RequestKey {
    /// Creates a key for `endpoint`, a fixed path relative to the API base
    /// URL. The path is split on `/`; empty segments are ignored.
    ///
    /// Use [`Self::from_segments`] when any part of the path comes from user
    /// input.
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        Self::from_segments(endpoint.as_ref().split('/'))
    }

    /// Creates a key from individual path segments. Each segment is kept
    /// whole; empty segments are ignored.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
            params: BTreeMap::new(),
        }
    }

    /// Adds a query parameter. A `token` parameter is discarded: the client
    /// injects its own.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key == TOKEN_PARAM {
            tracing::debug!("Ignoring caller-supplied token parameter on {}", self.endpoint());
            return self;
        }
        self.params.insert(key, value.into());
        self
    }

    /// Adds every pair from `params`, with the same token rule as [`Self::with_param`].
    pub fn with_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        params
            .into_iter()
            .fold(self, |key, (k, v)| key.with_param(k, v))
    }

    /// The path segments, unencoded.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The endpoint path relative to the API base URL. A `/` inside a
    /// segment is shown as `%2F`, the way it goes over the wire.
    pub fn endpoint(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.replace('%', "%25").replace('/', "%2F"))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The query parameters in key order.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint())?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}
