//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Adapter defaults shared by every request
    #[serde(default)]
    pub adapter: AdapterSection,

    /// The request to send
    #[serde(default)]
    pub request: RequestSection,

    /// Token injection and default body
    #[serde(default)]
    pub common: CommonSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Adapter defaults section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterSection {
    /// Base URL for relative request URLs
    pub base_url: Option<String>,

    /// Default headers, overridden per name by request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Request section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// Request URL
    pub url: Option<String>,

    /// HTTP method (default: GET)
    pub method: Option<String>,

    /// Request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body (any TOML value)
    pub data: Option<Value>,

    /// Response decoding: "json", "text", "blob" or "arrayBuffer"
    pub response_type: Option<String>,
}

/// Common request settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonSection {
    /// Token for the token header
    pub token: Option<String>,

    /// Prefix prepended to the token
    pub token_prefix: Option<String>,

    /// Header carrying the token (default: Authorization)
    pub token_header: Option<String>,

    /// Fail unless a token is configured
    #[serde(default)]
    pub require_token: bool,

    /// Object merged under every request body
    pub default_body: Option<Map<String, Value>>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of retries after the first attempt
    pub max_retries: Option<u32>,

    /// Delay (fixed) or initial delay (exponential) in milliseconds
    pub delay_ms: Option<u64>,

    /// Delay strategy: "fixed" or "exponential"
    pub strategy: Option<String>,

    /// Maximum delay in milliseconds (exponential only)
    pub max_delay_ms: Option<u64>,

    /// Backoff multiplier (exponential only)
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# req-scheduler configuration file

[adapter]
# Base URL that relative request URLs are resolved against
# base_url = "https://api.example.com/v1/"

# Request timeout in seconds
# timeout = 30

# Default headers (request headers with the same name win)
# [adapter.headers]
# User-Agent = "req-scheduler"

[request]
# Request URL, absolute or relative to adapter.base_url (required)
# url = "/status"

# HTTP method (default: GET, can be overridden by --method CLI flag)
# method = "GET"

# Response decoding: "json", "text", "blob" or "arrayBuffer"
# response_type = "json"

# Request body
# data = { name = "example" }

# Request headers
# [request.headers]
# X-Request-Id = "abc123"

[common]
# Token placed in the token header
# token = "your-token-here"
# token_prefix = "Bearer "
# token_header = "Authorization"

# Fail unless a token is configured
# require_token = false

# Object merged under every request body (request keys win)
# [common.default_body]
# client = "req-scheduler"

[retry]
# Maximum number of retries after the first attempt (default: 3, 0 disables)
# max_retries = 3

# Delay between retries in milliseconds (default: 1000)
# delay_ms = 1000

# Delay strategy: "fixed" or "exponential" (default: fixed)
# strategy = "fixed"

# Exponential strategy only
# max_delay_ms = 30000
# multiplier = 2.0
"#
    .to_string()
}
