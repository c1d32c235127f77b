//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde_json::Value;
use url::Url;

use crate::logger::LoggerOptions;
use crate::plugins::{Backoff, CommonConfigOptions, RetryDelay};
use crate::request::{RequestConfig, ResponseType};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{RetrySection, TomlConfig};

/// Retry settings resolved from CLI and TOML.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    /// Maximum number of retries after the first attempt (0 disables retry)
    pub max_retries: u32,
    /// Delay strategy between attempts
    pub delay: RetryDelay,
}

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Request URL, absolute or relative to `base_url` (required)
    pub url: String,

    /// Base URL for relative request URLs
    pub base_url: Option<Url>,

    /// HTTP method for the request
    pub method: Method,

    /// Adapter default headers
    pub default_headers: HeaderMap,

    /// Per-request headers
    pub headers: HeaderMap,

    /// Request body
    pub data: Option<Value>,

    /// Declared response decoding
    pub response_type: Option<ResponseType>,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// Options for the common-config plugin
    pub common: CommonConfigOptions,

    /// Retry settings
    pub retry: RetrySettings,

    /// Console logger options
    pub logger: LoggerOptions,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base_url = self.base_url.as_ref().map_or("none", Url::as_str);
        let response_type = self.response_type.map_or("raw", ResponseType::as_str);

        write!(
            f,
            "Config {{ method: {}, url: {}, base_url: {}, response_type: {}, \
             retry: {}x/{:?}, token: {}, dry_run: {} }}",
            self.method,
            self.url,
            base_url,
            response_type,
            self.retry.max_retries,
            self.retry.delay,
            if self.common.token.is_some() { "set" } else { "none" },
            self.logger.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing or cannot be resolved
    /// - The method, response type or a header is invalid
    /// - The retry settings are inconsistent
    /// - A token is required but missing
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base_url = Self::resolve_base_url(cli, toml)?;
        let url = Self::resolve_url(cli, toml, base_url.as_ref())?;
        let method = Self::resolve_method(cli, toml)?;

        // Adapter defaults come only from TOML; CLI headers are per-request
        let default_headers = toml.map_or_else(|| Ok(HeaderMap::new()), |t| {
            parse_header_table(&t.adapter.headers)
        })?;
        let headers = Self::resolve_headers(cli, toml)?;

        let data = cli
            .data
            .as_deref()
            .map(parse_data)
            .or_else(|| toml.and_then(|t| t.request.data.clone()));

        let response_type = Self::resolve_response_type(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let common = Self::build_common_options(cli, toml)?;
        let retry = Self::build_retry(cli, toml)?;

        Ok(Self {
            url,
            base_url,
            method,
            default_headers,
            headers,
            data,
            response_type,
            timeout,
            common,
            retry,
            logger: LoggerOptions {
                is_ci: cli.ci,
                dry_run: cli.dry_run,
                debug: cli.verbose,
                silent: cli.silent,
            },
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the defaults the adapter holds for every request.
    #[must_use]
    pub fn adapter_defaults(&self) -> RequestConfig {
        RequestConfig {
            base_url: self.base_url.as_ref().map(ToString::to_string),
            headers: self.default_headers.clone(),
            timeout: self.timeout,
            ..RequestConfig::default()
        }
    }

    /// Returns the per-call configuration of the request to send.
    #[must_use]
    pub fn request(&self) -> RequestConfig {
        RequestConfig {
            url: Some(self.url.clone()),
            method: Some(self.method.clone()),
            headers: self.headers.clone(),
            data: self.data.clone(),
            response_type: self.response_type,
            ..RequestConfig::default()
        }
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<Url>, ConfigError> {
        let Some(base) = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.adapter.base_url.as_deref()))
        else {
            return Ok(None);
        };

        Url::parse(base)
            .map(Some)
            .map_err(|e| ConfigError::InvalidUrl {
                url: base.to_string(),
                reason: e.to_string(),
            })
    }

    fn resolve_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        base_url: Option<&Url>,
    ) -> Result<String, ConfigError> {
        // CLI takes precedence
        let url = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set request.url in config file")
            })?;

        // Validate that the URL resolves the same way the adapter will resolve it
        let probe = RequestConfig {
            base_url: base_url.map(ToString::to_string),
            url: Some(url.to_string()),
            ..RequestConfig::default()
        };
        probe.resolve_url().map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url.to_string())
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .to_uppercase()
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        // Add TOML headers first (CLI can override)
        let mut headers = match toml {
            Some(toml) => parse_header_table(&toml.request.headers)?,
            None => HeaderMap::new(),
        };

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn resolve_response_type(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<ResponseType>, ConfigError> {
        if let Some(arg) = cli.response_type {
            return Ok(Some(arg.into()));
        }

        toml.and_then(|t| t.request.response_type.as_deref())
            .map(|value| {
                value
                    .parse::<ResponseType>()
                    .map_err(|_| ConfigError::InvalidResponseType {
                        value: value.to_string(),
                    })
            })
            .transpose()
    }

    fn resolve_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Duration>, ConfigError> {
        // Priority: CLI explicit > TOML; no timeout by default
        let Some(seconds) = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.adapter.timeout))
        else {
            return Ok(None);
        };

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Some(Duration::from_secs(seconds)))
    }

    fn build_common_options(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<CommonConfigOptions, ConfigError> {
        let common = toml.map(|t| &t.common);

        let token = cli
            .token
            .clone()
            .or_else(|| common.and_then(|c| c.token.clone()));
        let token_prefix = cli
            .token_prefix
            .clone()
            .or_else(|| common.and_then(|c| c.token_prefix.clone()));
        let token_header = cli
            .token_header
            .as_deref()
            .or_else(|| common.and_then(|c| c.token_header.as_deref()))
            .unwrap_or(defaults::TOKEN_HEADER);

        // Flags only enable, never disable
        let required_token = cli.require_token || common.is_some_and(|c| c.require_token);

        if required_token && token.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingToken);
        }

        Ok(CommonConfigOptions {
            token,
            token_prefix,
            token_header: Some(parse_header_name(token_header)?),
            required_token,
            default_body: common.and_then(|c| c.default_body.clone()),
            ..CommonConfigOptions::default()
        })
    }

    fn build_retry(cli: &Cli, toml: Option<&TomlConfig>) -> Result<RetrySettings, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_retries = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let delay_ms = cli
            .retry_delay_ms
            .or_else(|| retry.and_then(|r| r.delay_ms))
            .unwrap_or(defaults::RETRY_DELAY_MS);

        let strategy = retry.and_then(|r| r.strategy.as_deref()).unwrap_or("fixed");

        let delay = match strategy.to_lowercase().as_str() {
            "fixed" => RetryDelay::Fixed(Duration::from_millis(delay_ms)),
            "exponential" => RetryDelay::Exponential(build_backoff(retry, delay_ms)?),
            other => {
                return Err(ConfigError::InvalidRetry(format!(
                    "unknown strategy '{other}': expected fixed or exponential"
                )));
            }
        };

        Ok(RetrySettings { max_retries, delay })
    }
}

fn build_backoff(retry: Option<&RetrySection>, initial_delay_ms: u64) -> Result<Backoff, ConfigError> {
    let max_delay_ms = retry
        .and_then(|r| r.max_delay_ms)
        .unwrap_or(defaults::RETRY_MAX_DELAY_MS);

    let multiplier = retry
        .and_then(|r| r.multiplier)
        .unwrap_or(defaults::RETRY_MULTIPLIER);

    if multiplier <= 0.0 || !multiplier.is_finite() {
        return Err(ConfigError::InvalidRetry(
            "multiplier must be a positive finite number".to_string(),
        ));
    }

    if max_delay_ms < initial_delay_ms {
        return Err(ConfigError::InvalidRetry(format!(
            "max_delay_ms ({max_delay_ms}) must be >= delay_ms ({initial_delay_ms})"
        )));
    }

    Ok(Backoff::new()
        .with_initial_delay(Duration::from_millis(initial_delay_ms))
        .with_max_delay(Duration::from_millis(max_delay_ms))
        .with_multiplier(multiplier))
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Parses a CLI body: valid JSON is kept structured, anything else is text.
fn parse_data(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_header_table(table: &HashMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    for (name, value) in table {
        headers.insert(parse_header_name(name)?, parse_header_value(name, value)?);
    }
    Ok(headers)
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // "Key=Value" or "Key: Value"; neither separator can appear in a name
    let Some(split) = s.find(['=', ':']) else {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    };

    let (name, value) = (&s[..split], &s[split + 1..]);
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
