//! Error types for rollup node transport operations.

use thiserror::Error;

use rollup_config::EndpointParseError;

/// Errors surfaced while talking to the rollup node.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// A route URL could not be derived from the configured endpoint.
    #[error("invalid URL for route '{route}': {source}")]
    Route {
        /// Route being addressed.
        route: &'static str,
        /// Underlying URL error.
        #[source]
        source: EndpointParseError,
    },
    /// The HTTP exchange failed before a response was received.
    #[error("request to '{route}' failed: {source}")]
    Request {
        /// Route being addressed.
        route: &'static str,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// The node answered with an unexpected status code.
    #[error("'{route}' returned status {status}: {body}")]
    Status {
        /// Route being addressed.
        route: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },
    /// The node's response body could not be parsed.
    #[error("malformed response from '{route}': {source}")]
    Response {
        /// Route being addressed.
        route: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The node classified the next request with an unknown type.
    #[error("unknown request type '{request_type}'")]
    UnknownRequestType {
        /// Type string received.
        request_type: String,
    },
    /// A shutdown was requested while waiting for the next request.
    #[error("interrupted while waiting for the next request")]
    Interrupted,
}

impl TransportError {
    /// Returns `true` when the error reflects a requested shutdown rather than
    /// a transport failure.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
