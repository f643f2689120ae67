//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or its body could not be read
    /// (connection error, timeout).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The base URL and endpoint did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
