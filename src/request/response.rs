//! Response types returned by adapters.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::RequestConfig;

/// Response body in raw or decoded form.
///
/// Adapters produce [`Body::Bytes`] (or [`Body::Empty`]); decoding plugins
/// may replace it with [`Body::Json`] or [`Body::Text`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No body
    #[default]
    Empty,
    /// Raw, undecoded bytes
    Bytes(Vec<u8>),
    /// UTF-8 text
    Text(String),
    /// Parsed JSON value
    Json(Value),
}

impl Body {
    /// Returns true if the body has not been decoded yet.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Empty | Self::Bytes(_))
    }

    /// Returns the body as text, if it is text or a JSON string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(Value::String(s)) => Some(s),
            Self::Bytes(b) => std::str::from_utf8(b).ok(),
            Self::Empty | Self::Json(_) => None,
        }
    }

    /// Deserializes the body into `T`.
    ///
    /// Raw bytes are parsed as JSON; text is treated as a JSON string value;
    /// an empty body deserializes from `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not match the shape of `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Empty => serde_json::from_value(Value::Null),
            Self::Bytes(b) => serde_json::from_slice(b),
            Self::Text(s) => serde_json::from_value(Value::String(s.clone())),
            Self::Json(v) => T::deserialize(v),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Bytes(bytes)
        }
    }
}

/// A response produced by an [`Adapter`](super::Adapter).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,
    /// Reason phrase for the status code
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub data: Body,
    /// The finalized configuration the request was sent with
    pub config: RequestConfig,
}

impl Response {
    /// Creates a response, deriving `status_text` from the status code.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, data: Body, config: RequestConfig) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            data,
            config,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserializes the response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not match the shape of `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.data.deserialize()
    }
}
