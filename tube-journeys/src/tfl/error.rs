//! TfL client error types.

/// Errors from the TfL API client.
///
/// Rate limiting is not represented here: a rate-limited response is
/// retried after the advised delay and never surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not JSON, or JSON did not have the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// API returned an error object in the body
    #[error("API error {status}: {message}")]
    Api { status: u64, message: String },

    /// A 429 response whose message carried no usable retry delay
    #[error("malformed rate-limit message: {message:?}")]
    MalformedRateLimit { message: String },
}

impl From<serde_json::Error> for TflError {
    fn from(err: serde_json::Error) -> Self {
        TflError::Json {
            message: err.to_string(),
        }
    }
}
