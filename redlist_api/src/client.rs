//! HTTP client for the IUCN Red List v3 API.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::{request::TOKEN_PARAM, Error, RequestKey};

/// Production base URL of the Red List v3 API.
pub const DEFAULT_BASE_URL: &str = "https://apiv3.iucnredlist.org/api/v3/";

/// Per-request timeout used unless the caller picks another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Red List API.
///
/// Every request is a `GET <base_url>/<endpoint>?<params>&token=<token>`; the
/// token is always appended last. The underlying `reqwest::Client` is built
/// once and reused.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    token: String,
}

impl Client {
    /// Creates a client pointing at the production API.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        Self::with_options(DEFAULT_BASE_URL, token, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self, Error> {
        Self::with_options(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom base URL and request timeout.
    pub fn with_options(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.to_string(),
            token: token.into(),
        })
    }

    fn get_url(&self, key: &RequestKey) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::InvalidUrl(e.to_string())
        })?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{} cannot be a base", self.base_api_url)))?
            .pop_if_empty()
            .extend(key.segments());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in key.params() {
                pairs.append_pair(k, v);
            }
            pairs.append_pair(TOKEN_PARAM, &self.token);
        }
        Ok(url)
    }

    /// Issues a GET for `key` and returns the parsed JSON body.
    ///
    /// Transport failures, non-2xx statuses and unparsable bodies are all
    /// errors; callers decide what to do with them.
    pub async fn get_json(&self, key: &RequestKey) -> Result<Value, Error> {
        let url = self.get_url(key)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", key, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body for {}: {}", key, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("{} failed with status {}: {}", key, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse {}: {} | body: {}", key, e, snippet);
            Error::Parse(e.to_string())
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
