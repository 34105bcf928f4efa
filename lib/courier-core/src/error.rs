//! Error types for courier.

use std::collections::HashMap;

use derive_more::{Display, Error, From};

// ============================================================================
// Rest Error Model
// ============================================================================

/// Wire model for an error response body.
///
/// Services in the courier family report failures as a JSON document with a
/// human readable message plus optional machine readable details. Decoders
/// parse error bodies into this model; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestError {
    /// Human readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine readable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Name of the application that produced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    /// Request path that produced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Timestamp of the failure, as reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RestError {
    /// Creates a message-only error model.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.error_code, &self.message) {
            (Some(code), Some(message)) => write!(f, "[{code}] {message}"),
            (Some(code), None) => write!(f, "[{code}]"),
            (None, Some(message)) => write!(f, "{message}"),
            (None, None) => write!(f, "no error details"),
        }
    }
}

// ============================================================================
// Error Decoder Trait
// ============================================================================

/// Trait for converting a rejected HTTP response into an [`Error`].
///
/// The dispatcher calls the decoder whenever the configured error detector
/// matches a response status. The decoder receives the status, the response
/// headers, and the buffered body, and returns the error surfaced to the
/// caller (usually [`Error::Rejected`]).
pub trait ErrorDecoder: Send + Sync {
    /// Decode a rejected response into an error.
    fn decode(
        &self,
        status: u16,
        headers: &HashMap<String, String>,
        body: &bytes::Bytes,
    ) -> Error;
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Proxy configuration error (missing builder, non-interface target, ...).
    ///
    /// Raised at proxy-build time or at the invocation seam; never retried.
    #[display("contract error: {_0}")]
    #[from(skip)]
    Contract(#[error(not(source))] String),

    /// Response rejected by the configured error detector and decoded into
    /// the domain error model.
    #[display("HTTP {status} rejected: {error}")]
    #[from(skip)]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response headers.
        headers: HashMap<String, String>,
        /// Decoded error body.
        #[error(not(source))]
        error: RestError,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request (bad argument kind, malformed header value, ...).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a contract (configuration) error.
    #[must_use]
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Create a rejected-response error.
    #[must_use]
    pub fn rejected(status: u16, headers: HashMap<String, String>, error: RestError) -> Self {
        Self::Rejected {
            status,
            headers,
            error,
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is a rejected response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded error model if this is a rejected response.
    #[must_use]
    pub const fn rest_error(&self) -> Option<&RestError> {
        match self {
            Self::Rejected { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns the response headers if this is a rejected response.
    #[must_use]
    pub const fn response_headers(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Rejected { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// Returns `true` if this is a rejected client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a rejected server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }
}
