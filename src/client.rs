//! Core HTTP client for the OI analytics REST API.
//!
//! The [`ChainClient`] struct is the main entry point for the backend. It
//! wraps [`reqwest::Client`] with the configured base URL and timeout and
//! provides a typed `get` helper that treats any non-object JSON body as a
//! malformed payload.
//!
//! API endpoint methods are added to `ChainClient` via `impl` blocks in the
//! [`crate::api`] module.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::constants::{BackendMachine, DEFAULT_BASE_URL, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{ApiErrorBody, ChainError, Result};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`ChainClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for REST requests, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`ChainClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use oichain_rs::client::ChainClientBuilder;
///
/// # fn main() -> oichain_rs::Result<()> {
/// let client = ChainClientBuilder::new()
///     .machine("M123")?
///     .timeout(std::time::Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChainClientBuilder {
    config: ClientConfig,
}

impl ChainClientBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at an explicit base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Point the client at a named backend machine (e.g. `"M124"`).
    pub fn machine(mut self, name: &str) -> Result<Self> {
        let machine = BackendMachine::by_name(name)
            .ok_or_else(|| ChainError::InvalidArgument(format!("unknown backend machine {name:?}")))?;
        self.config.base_url = machine.url.to_owned();
        Ok(self)
    }

    /// Set the per-request timeout. Default: 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the [`ChainClient`].
    pub fn build(self) -> Result<ChainClient> {
        ChainClient::with_config(self.config)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Core HTTP client for the OI analytics REST API.
///
/// # Example
///
/// ```no_run
/// use oichain_rs::client::ChainClient;
///
/// # #[tokio::main]
/// # async fn main() -> oichain_rs::Result<()> {
/// let client = ChainClient::new("http://localhost:5000")?;
/// let symbols = client.get_symbols().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChainClient {
    http: reqwest::Client,
    /// Base URL for REST API requests.
    base_url: String,
}

impl ChainClient {
    /// Create a client for `base_url` with default timeout and headers.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// Create a client from a full [`ClientConfig`].
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ChainError::InvalidArgument(format!("user agent: {e}")))?;
        let http = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_owned();
        // Reject unusable base URLs up front rather than on first request.
        Url::parse(&base_url)?;

        Ok(Self { http, base_url })
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request with query parameters and deserialize the JSON
    /// object response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<R> {
        let url = self.url(path, query)?;
        tracing::debug!(%url, "GET");

        let resp = self.http.get(url).send().await?;

        self.handle_response(resp).await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Build the full URL from a path segment and query pairs.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let mut url = Url::parse(&joined)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Read a response, returning either the deserialized body or a `ChainError`.
    ///
    /// Success bodies must be JSON objects; anything else is reported as
    /// [`ChainError::MalformedPayload`].
    async fn handle_response<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            decode_object(&bytes)
        } else {
            let body = String::from_utf8_lossy(&bytes);
            Err(self.parse_error_body(status, &body))
        }
    }

    /// Try to parse the API's JSON error structure; fall back to a raw HTTP
    /// status error.
    pub(crate) fn parse_error_body(&self, status: reqwest::StatusCode, body: &str) -> ChainError {
        if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(body) {
            if api_err.error.is_some() || api_err.message.is_some() {
                return ChainError::Api(api_err);
            }
        }
        ChainError::HttpStatus {
            status,
            body: body.to_owned(),
        }
    }
}

/// Decode a success body, requiring a top-level JSON object.
pub(crate) fn decode_object<R: DeserializeOwned>(bytes: &[u8]) -> Result<R> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(ChainError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(ChainError::Json)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::option_chain::SymbolListResponse;

    #[test]
    fn non_object_bodies_are_malformed() {
        let err = decode_object::<SymbolListResponse>(br#"["NIFTY"]"#).unwrap_err();
        assert!(matches!(err, ChainError::MalformedPayload(_)));
    }

    #[test]
    fn missing_keys_are_json_errors() {
        let err = decode_object::<SymbolListResponse>(br#"{"names": []}"#).unwrap_err();
        assert!(matches!(err, ChainError::Json(_)));
        assert!(err.is_degradable());
    }

    #[test]
    fn query_pairs_are_encoded() {
        let client = ChainClient::new("http://localhost:5000/").unwrap();
        let url = client
            .url("/get_dates", &[("symbol", "NIFTY"), ("expiry", "27 MAR")])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/get_dates?symbol=NIFTY&expiry=27+MAR");
    }

    #[test]
    fn unknown_machine_is_rejected() {
        assert!(ChainClientBuilder::new().machine("M999").is_err());
        let client = ChainClientBuilder::new().machine("m123").unwrap().build().unwrap();
        assert_eq!(client.base_url(), "http://54.221.81.212:5000");
    }
}
