//! Request configuration and merge rules.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use url::Url;

use super::TransportError;

/// How a response body should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Parse the body as JSON.
    Json,
    /// Decode the body as UTF-8 text.
    Text,
    /// Keep the body as opaque bytes.
    Blob,
    /// Keep the body as a raw byte buffer.
    ArrayBuffer,
}

impl ResponseType {
    /// Returns the canonical name of this response type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::ArrayBuffer => "arrayBuffer",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "blob" => Ok(Self::Blob),
            "arraybuffer" | "array_buffer" | "array-buffer" => Ok(Self::ArrayBuffer),
            _ => Err(format!(
                "unknown response type '{s}': expected json, text, blob, or arrayBuffer"
            )),
        }
    }
}

/// Configuration for a single request.
///
/// Every field is optional so the same type describes both an adapter's
/// defaults and the parameters of one call. Use [`RequestConfig::merge`] to
/// layer a call over defaults.
///
/// # Example
///
/// ```
/// use req_scheduler::request::RequestConfig;
/// use serde_json::json;
///
/// let config = RequestConfig::new()
///     .with_url("/users")
///     .with_method(http::Method::POST)
///     .with_data(json!({"name": "ada"}));
///
/// assert_eq!(config.url.as_deref(), Some("/users"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Base URL that relative `url` values are resolved against
    pub base_url: Option<String>,
    /// Absolute URL, or a path relative to `base_url`
    pub url: Option<String>,
    /// HTTP method (adapters default to GET)
    pub method: Option<Method>,
    /// HTTP headers to send
    pub headers: HeaderMap,
    /// Request body
    pub data: Option<Value>,
    /// Declared decoding for the response body
    pub response_type: Option<ResponseType>,
    /// Per-request timeout, enforced by the adapter
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets a header, replacing any existing values for the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the declared response type.
    #[must_use]
    pub const fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Layers `call` over `defaults`.
    ///
    /// Fields set on `call` win. Header maps merge by name: a header present
    /// on `call` replaces every value of the same-named default header, while
    /// unrelated default headers are kept. `defaults` is never modified.
    #[must_use]
    pub fn merge(defaults: &Self, call: Self) -> Self {
        let mut headers = defaults.headers.clone();
        for name in call.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &call.headers {
            headers.append(name, value.clone());
        }

        Self {
            base_url: call.base_url.or_else(|| defaults.base_url.clone()),
            url: call.url.or_else(|| defaults.url.clone()),
            method: call.method.or_else(|| defaults.method.clone()),
            headers,
            data: call.data.or_else(|| defaults.data.clone()),
            response_type: call.response_type.or(defaults.response_type),
            timeout: call.timeout.or(defaults.timeout),
        }
    }

    /// Returns the configured method, or GET if none is set.
    #[must_use]
    pub fn method_or_default(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Resolves the final request URL.
    ///
    /// An absolute `url` is used as-is. A relative one is joined onto
    /// `base_url` following RFC 3986 rules, so `/x` replaces the base path
    /// while `x` is appended after the base's last `/`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if no absolute URL can be formed.
    pub fn resolve_url(&self) -> Result<Url, TransportError> {
        let target = self.url.as_deref().unwrap_or_default();

        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_deref().ok_or_else(|| {
                    TransportError::InvalidUrl(format!("relative URL '{target}' without base URL"))
                })?;
                Url::parse(base)
                    .and_then(|base| base.join(target))
                    .map_err(|e| TransportError::InvalidUrl(format!("{base} + {target}: {e}")))
            }
            Err(e) => Err(TransportError::InvalidUrl(format!("{target}: {e}"))),
        }
    }
}

impl From<&str> for RequestConfig {
    fn from(url: &str) -> Self {
        Self::new().with_url(url)
    }
}

impl From<String> for RequestConfig {
    fn from(url: String) -> Self {
        Self::new().with_url(url)
    }
}
