//! Error types for transport operations.

use thiserror::Error;

/// Error type for adapter requests.
///
/// Describes what went wrong without dictating recovery strategy;
/// retry plugins decide which variants are worth another attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The request URL is invalid or could not be resolved.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Body(#[source] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status}")]
    Status {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },
}
