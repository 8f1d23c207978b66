//! TfL unified API HTTP client.
//!
//! Injects the application credentials into every request and waits out
//! rate limiting transparently. The actual GET is delegated to a
//! [`Transport`] so the retry logic can be exercised without a network.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::TflError;
use super::types::{LineDto, StopPointDetailDto, StopPointDto};

/// Default base URL for the TfL unified API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Status code TfL reports in the body of a rate-limited response.
const RATE_LIMITED: u64 = 429;

/// Text preceding the advised wait in a rate-limit message.
const RETRY_MARKER: &str = "Try again in ";

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Application id, sent as `app_id`
    pub app_id: String,
    /// Application key, sent as `app_key`
    pub app_key: String,
    /// Base URL for the API (defaults to production TfL)
    pub base_url: String,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl TflConfig {
    /// Create a new config with the given credentials.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Performs a single GET and parses the body as JSON.
///
/// Implementations must not interpret the body: the HTTP status is ignored
/// because TfL reports errors (including rate limiting) inside the JSON.
pub trait Transport {
    fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, TflError>>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build the underlying HTTP client.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, TflError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, TflError> {
        let response = self.http.get(url).query(query).send().await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TflError::Json {
            message: format!(
                "{e} (body: {})",
                body.chars().take(500).collect::<String>()
            ),
        })
    }
}

/// TfL API client.
#[derive(Debug, Clone)]
pub struct TflClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    credentials: Vec<(String, String)>,
}

impl TflClient<HttpTransport> {
    /// Create a client that talks to the real API over HTTP.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> TflClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: TflConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: vec![
                ("app_id".to_string(), config.app_id),
                ("app_key".to_string(), config.app_key),
            ],
        }
    }

    /// The transport this client sends requests through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `{base_url}/{endpoint}` and return the parsed body.
    ///
    /// Credentials are always sent; an explicit parameter with the same key
    /// replaces the credential. A rate-limited response is retried, with no
    /// cap, after sleeping for exactly the delay the server advises.
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, TflError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let query = merge_query(&self.credentials, params);

        loop {
            let body = self.transport.get_json(&url, &query).await?;

            match status_code(&body) {
                Some(RATE_LIMITED) => {
                    let delay = retry_delay(message(&body))?;
                    warn!(endpoint, delay_secs = delay, "rate limited, waiting");
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
                Some(status) if status >= 400 => {
                    return Err(TflError::Api {
                        status,
                        message: message(&body).to_string(),
                    });
                }
                _ => return Ok(body),
            }
        }
    }

    /// [`fetch`](Self::fetch) and deserialize the body.
    pub async fn fetch_as<D: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<D, TflError> {
        let body = self.fetch(endpoint, params).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// All lines running in a transport mode (e.g. `tube`).
    pub async fn lines_for_mode(&self, mode: &str) -> Result<Vec<LineDto>, TflError> {
        self.fetch_as(&format!("Line/Mode/{mode}"), &[]).await
    }

    /// The stops of a line, in running order.
    pub async fn stop_points(&self, line_id: &str) -> Result<Vec<StopPointDto>, TflError> {
        debug!(line_id, "fetching stop points");
        self.fetch_as(&format!("Line/{line_id}/StopPoints"), &[]).await
    }

    /// Details of a single stop point.
    pub async fn stop_point(&self, naptan_id: &str) -> Result<StopPointDetailDto, TflError> {
        self.fetch_as(&format!("StopPoint/{naptan_id}"), &[]).await
    }
}

/// Merge explicit parameters over the base ones, replacing on equal keys.
fn merge_query(base: &[(String, String)], params: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut query = base.to_vec();
    for &(key, value) in params {
        match query.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => query.push((key.to_string(), value.to_string())),
        }
    }
    query
}

/// `statusCode` of an error object, if the body is one.
fn status_code(body: &Value) -> Option<u64> {
    body.get("statusCode").and_then(Value::as_u64)
}

fn message(body: &Value) -> &str {
    body.get("message").and_then(Value::as_str).unwrap_or_default()
}

/// Parse the wait from e.g. `"Rate limit is exceeded. Try again in 7 seconds."`.
fn retry_delay(message: &str) -> Result<u64, TflError> {
    message
        .split_once(RETRY_MARKER)
        .and_then(|(_, rest)| rest.split(' ').next())
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| TflError::MalformedRateLimit {
            message: message.to_string(),
        })
}
