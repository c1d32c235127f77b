//! Production adapter implementation using reqwest.

use http::header::CONTENT_TYPE;
use http::HeaderValue;
use serde_json::Value;

use super::{Adapter, Body, RequestConfig, Response, TransportError};

/// Production adapter using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements the
/// [`Adapter`] trait. It inherits reqwest's connection pooling and applies
/// the per-request timeout from [`RequestConfig::timeout`].
///
/// Non-2xx responses are reported as [`TransportError::Status`] so retry
/// policies can inspect the status code.
///
/// # Example
///
/// ```no_run
/// use req_scheduler::request::{Adapter, ReqwestAdapter, RequestConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let adapter = ReqwestAdapter::new()
///     .with_defaults(RequestConfig::new().with_base_url("https://api.example.com/"));
/// let response = adapter.request(RequestConfig::from("/health")).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestAdapter {
    inner: reqwest::Client,
    defaults: RequestConfig,
}

impl ReqwestAdapter {
    /// Creates an adapter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_client(reqwest::Client::new())
    }

    /// Creates an adapter from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, etc.).
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            inner: client,
            defaults: RequestConfig::default(),
        }
    }

    /// Sets the defaults every request is merged over.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Default for ReqwestAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ReqwestAdapter {
    fn config(&self) -> &RequestConfig {
        &self.defaults
    }

    async fn request(&self, config: RequestConfig) -> Result<Response, TransportError> {
        let url = config.resolve_url()?;
        let mut builder = self.inner.request(config.method_or_default(), url.as_str());

        for (name, value) in &config.headers {
            builder = builder.header(name, value);
        }

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(data) = &config.data {
            if !matches!(data, Value::String(_)) && !config.headers.contains_key(CONTENT_TYPE) {
                builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            builder = builder.body(encode_body(data)?);
        }

        tracing::debug!(method = %config.method_or_default(), %url, "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::InvalidUrl(e.to_string())
            } else {
                TransportError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(Box::new(e))
                }
            })?
            .to_vec();

        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                body: String::from_utf8(body).ok(),
            });
        }

        Ok(Response::new(status, headers, Body::from(body), config))
    }
}

/// Encodes a request body: strings are sent verbatim, everything else as JSON.
fn encode_body(data: &Value) -> Result<Vec<u8>, TransportError> {
    match data {
        Value::String(s) => Ok(s.clone().into_bytes()),
        other => serde_json::to_vec(other).map_err(TransportError::Body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_empty_defaults() {
        let adapter = ReqwestAdapter::new();
        assert_eq!(adapter.config(), &RequestConfig::default());
    }

    #[test]
    fn with_defaults_replaces_defaults() {
        let defaults = RequestConfig::new().with_base_url("https://example.com/");
        let adapter = ReqwestAdapter::default().with_defaults(defaults.clone());

        assert_eq!(adapter.config(), &defaults);
    }

    #[test]
    fn adapter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestAdapter>();
    }

    #[test]
    fn encode_body_sends_strings_verbatim() {
        let encoded = encode_body(&json!("a=1&b=2")).unwrap();
        assert_eq!(encoded, b"a=1&b=2");
    }

    #[test]
    fn encode_body_serializes_structured_values_as_json() {
        let encoded = encode_body(&json!({"k": [1, 2]})).unwrap();
        assert_eq!(encoded, br#"{"k":[1,2]}"#);
    }

    #[tokio::test]
    async fn relative_url_without_base_fails_before_sending() {
        let adapter = ReqwestAdapter::new();
        let result = adapter.request(RequestConfig::from("/relative")).await;

        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn request_to_invalid_host_returns_error_or_proxy_response() {
        let adapter = ReqwestAdapter::new();
        let result = adapter
            .request(RequestConfig::from("http://invalid.invalid.invalid/"))
            .await;

        // Behind some proxies the lookup succeeds with an error page instead.
        match result {
            Err(TransportError::Connection(_) | TransportError::Timeout | TransportError::Status { .. })
            | Ok(_) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
