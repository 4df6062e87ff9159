//! Error types for the `oichain-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, ChainError>`.
//!
//! [`ChainError`] covers:
//! - **API errors** — Structured error bodies returned by the analytics backend
//! - **HTTP status errors** — Unexpected status codes with response body
//! - **HTTP transport errors** — Network, TLS, timeout failures
//! - **JSON errors** — Deserialization failures
//! - **Malformed payloads** — Valid JSON of the wrong shape
//! - **URL errors** — Malformed URL construction
//! - **Caller errors** — Invalid arguments and invalid selections
//!
//! The first six kinds are what the resolver degrades to fallback data; see
//! [`ChainError::is_degradable`].

use std::fmt;

use crate::types::enums::Level;

/// Error body returned by the analytics backend on a non-2xx response.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Short error label (e.g. "Not Found").
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable description of the error.
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error.as_deref().unwrap_or("Unknown Error"),
            self.message.as_deref().unwrap_or("No message"),
        )
    }
}

/// All possible errors produced by `oichain-rs`.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An error response returned by the backend REST API.
    #[error("API error: {0}")]
    Api(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response body.
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload was valid JSON but not the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A selection that the level cannot currently accept.
    #[error("Invalid selection for {level}: {value:?}")]
    InvalidSelection {
        /// The level the selection was made on.
        level: Level,
        /// The rejected value.
        value: String,
    },
}

impl ChainError {
    /// Whether this error is a transport or payload-shape failure.
    ///
    /// Degradable errors are recovered locally by substituting fallback data.
    /// Caller errors (invalid arguments and selections) are not.
    pub fn is_degradable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidArgument(_) | Self::InvalidSelection { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChainError>;
