//! Common request shaping: default headers, auth token, default body, decoding.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::config::ConfigError;
use crate::pipeline::{BoxError, Plugin, PluginError};
use crate::request::{Body, RequestConfig, RequestContext, Response, ResponseType, TransportError};

/// Caller-supplied transformation applied to the merged request body.
pub type BodySerializer = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

/// Options for [`CommonConfigPlugin`].
///
/// # Defaults
///
/// - no default headers
/// - no token; the token header is `Authorization` with no prefix
/// - `required_token`: false
/// - no default body and no serializer
#[derive(Clone, Default)]
pub struct CommonConfigOptions {
    /// Headers applied under every call's headers
    pub headers: HeaderMap,
    /// Token placed in the token header
    pub token: Option<String>,
    /// Prefix prepended to the token (e.g. `"Bearer "`)
    pub token_prefix: Option<String>,
    /// Header carrying the token (default: `Authorization`)
    pub token_header: Option<HeaderName>,
    /// Fail construction if no token is supplied
    pub required_token: bool,
    /// Object merged under every call's body
    pub default_body: Option<Map<String, Value>>,
    /// Transformation applied to the final body
    pub serializer: Option<BodySerializer>,
}

impl CommonConfigOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a default header, replacing previous values for the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the token prefix.
    #[must_use]
    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = Some(prefix.into());
        self
    }

    /// Sets the header that carries the token.
    #[must_use]
    pub fn with_token_header(mut self, header: HeaderName) -> Self {
        self.token_header = Some(header);
        self
    }

    /// Requires a token to be present at construction.
    #[must_use]
    pub const fn require_token(mut self) -> Self {
        self.required_token = true;
        self
    }

    /// Sets the default body object.
    #[must_use]
    pub fn with_default_body(mut self, body: Map<String, Value>) -> Self {
        self.default_body = Some(body);
        self
    }

    /// Sets the body serializer.
    #[must_use]
    pub fn with_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.serializer = Some(Arc::new(serializer));
        self
    }
}

impl fmt::Debug for CommonConfigOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonConfigOptions")
            .field("headers", &self.headers)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_prefix", &self.token_prefix)
            .field("token_header", &self.token_header)
            .field("required_token", &self.required_token)
            .field("default_body", &self.default_body)
            .field("serializer", &self.serializer.is_some())
            .finish()
    }
}

/// Plugin applying shared request settings and decoding responses.
///
/// `on_before`:
/// - merges default headers under the call's headers (call wins per name)
/// - forces `Content-Type: application/json` for `json` responses
/// - sets the token header to `prefix + token` when a token is configured
/// - deep-merges the default body under the call's object body, filling
///   only missing keys
/// - passes the body through the serializer, if any
///
/// `on_success`: decodes a raw response body according to the call's
/// declared [`ResponseType`].
///
/// # Example
///
/// ```
/// use req_scheduler::plugins::{CommonConfigOptions, CommonConfigPlugin};
///
/// let plugin = CommonConfigPlugin::new(
///     CommonConfigOptions::new()
///         .with_token("secret")
///         .with_token_prefix("Bearer ")
///         .require_token(),
/// );
/// assert!(plugin.is_ok());
///
/// let missing = CommonConfigPlugin::new(CommonConfigOptions::new().require_token());
/// assert!(missing.is_err());
/// ```
pub struct CommonConfigPlugin {
    headers: HeaderMap,
    auth: Option<(HeaderName, HeaderValue)>,
    default_body: Option<Map<String, Value>>,
    serializer: Option<BodySerializer>,
}

impl CommonConfigPlugin {
    /// Plugin name used for duplicate detection.
    pub const NAME: &'static str = "CommonConfigPlugin";

    /// Creates the plugin, validating the token configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingToken`] if `required_token` is set and no
    ///   non-empty token is supplied
    /// - [`ConfigError::InvalidHeaderValue`] if the token cannot be sent as a
    ///   header value
    pub fn new(options: CommonConfigOptions) -> Result<Self, ConfigError> {
        let token = options.token.filter(|t| !t.is_empty());

        let auth = match token {
            Some(token) => {
                let header = options.token_header.unwrap_or(AUTHORIZATION);
                let raw = format!("{}{token}", options.token_prefix.unwrap_or_default());
                let mut value =
                    HeaderValue::from_str(&raw).map_err(|e| ConfigError::InvalidHeaderValue {
                        name: header.to_string(),
                        reason: e.to_string(),
                    })?;
                value.set_sensitive(true);
                Some((header, value))
            }
            None if options.required_token => return Err(ConfigError::MissingToken),
            None => None,
        };

        Ok(Self {
            headers: options.headers,
            auth,
            default_body: options.default_body,
            serializer: options.serializer,
        })
    }

    fn apply_headers(&self, params: &mut RequestConfig) {
        for name in self.headers.keys() {
            if params.headers.contains_key(name) {
                continue;
            }
            for value in self.headers.get_all(name) {
                params.headers.append(name, value.clone());
            }
        }

        if params.response_type == Some(ResponseType::Json) {
            params
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some((name, value)) = &self.auth {
            params.headers.insert(name, value.clone());
        }
    }

    fn apply_body(&self, params: &mut RequestConfig) -> Result<(), PluginError> {
        if let Some(defaults) = &self.default_body {
            params.data = match params.data.take() {
                None | Some(Value::Null) => Some(Value::Object(defaults.clone())),
                Some(Value::Object(mut body)) => {
                    fill_missing(&mut body, defaults);
                    Some(Value::Object(body))
                }
                other => other,
            };
        }

        if let Some(serializer) = &self.serializer {
            if let Some(data) = params.data.take() {
                params.data = Some(serializer(data).map_err(PluginError::Serialize)?);
            }
        }

        Ok(())
    }
}

impl fmt::Debug for CommonConfigPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonConfigPlugin")
            .field("headers", &self.headers)
            .field("auth_header", &self.auth.as_ref().map(|(name, _)| name))
            .field("default_body", &self.default_body)
            .field("serializer", &self.serializer.is_some())
            .finish()
    }
}

/// Copies keys from `defaults` that are missing in `target`, recursing into
/// nested objects present on both sides.
fn fill_missing(target: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, default) in defaults {
        match (target.get_mut(key), default) {
            (None, _) => {
                target.insert(key.clone(), default.clone());
            }
            (Some(Value::Object(inner)), Value::Object(default_inner)) => {
                fill_missing(inner, default_inner);
            }
            (Some(_), _) => {}
        }
    }
}

/// Decodes a raw body per the declared response type.
///
/// Bodies that were already decoded are returned unchanged.
fn decode(kind: ResponseType, body: Body) -> Result<Body, PluginError> {
    let bytes = match body {
        Body::Empty => Vec::new(),
        Body::Bytes(bytes) => bytes,
        decoded @ (Body::Text(_) | Body::Json(_)) => return Ok(decoded),
    };

    match kind {
        ResponseType::Json if bytes.iter().all(u8::is_ascii_whitespace) => {
            Ok(Body::Json(Value::Null))
        }
        ResponseType::Json => serde_json::from_slice(&bytes)
            .map(Body::Json)
            .map_err(|e| PluginError::Decode {
                kind: kind.as_str(),
                reason: e.to_string(),
            }),
        ResponseType::Text => String::from_utf8(bytes)
            .map(Body::Text)
            .map_err(|e| PluginError::Decode {
                kind: kind.as_str(),
                reason: e.to_string(),
            }),
        ResponseType::Blob | ResponseType::ArrayBuffer => Ok(Body::Bytes(bytes)),
    }
}

#[async_trait]
impl Plugin<RequestConfig, Response, TransportError> for CommonConfigPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_before(&self, ctx: &mut RequestContext) -> Result<(), PluginError> {
        self.apply_headers(&mut ctx.parameters);
        self.apply_body(&mut ctx.parameters)
    }

    async fn on_success(&self, ctx: &mut RequestContext) -> Result<(), PluginError> {
        let Some(kind) = ctx.parameters.response_type else {
            return Ok(());
        };
        let Some(response) = ctx.return_value.as_mut() else {
            return Ok(());
        };

        let raw = std::mem::take(&mut response.data);
        response.data = decode(kind, raw)?;
        Ok(())
    }
}
