//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::request::ResponseType;

/// req-scheduler: send a request through a plugin pipeline
///
/// Sends one request via the production adapter, with default headers,
/// token injection, response decoding and bounded retry applied by plugins.
#[derive(Debug, Parser)]
#[command(name = "req-scheduler")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Request URL, absolute or relative to the base URL
    #[arg(long)]
    pub url: Option<String>,

    /// Base URL that relative request URLs are resolved against
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// HTTP method
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", short = 'H', value_name = "K=V")]
    pub headers: Vec<String>,

    /// Request body; parsed as JSON when possible, sent as text otherwise
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// How to decode the response body
    #[arg(long = "response-type", value_enum)]
    pub response_type: Option<ResponseTypeArg>,

    /// Token sent in the token header
    #[arg(long)]
    pub token: Option<String>,

    /// Prefix prepended to the token (e.g. 'Bearer ')
    #[arg(long = "token-prefix")]
    pub token_prefix: Option<String>,

    /// Header carrying the token
    #[arg(long = "token-header")]
    pub token_header: Option<String>,

    /// Fail unless a token is configured
    #[arg(long = "require-token")]
    pub require_token: bool,

    /// Maximum number of retries after the first attempt
    #[arg(long = "retry-max")]
    pub retry_max: Option<u32>,

    /// Delay between retries in milliseconds
    #[arg(long = "retry-delay-ms")]
    pub retry_delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Suppress all output
    #[arg(long, short)]
    pub silent: bool,

    /// Running under CI (no blank-line padding)
    #[arg(long)]
    pub ci: bool,
}

/// Subcommands for req-scheduler
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "req-scheduler.toml")]
        output: PathBuf,
    },
}

/// Response type argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResponseTypeArg {
    /// Parse the body as JSON
    #[value(name = "json")]
    Json,
    /// Decode the body as UTF-8 text
    #[value(name = "text")]
    Text,
    /// Keep the body as bytes
    #[value(name = "blob")]
    Blob,
    /// Keep the body as a byte buffer
    #[value(name = "array-buffer")]
    ArrayBuffer,
}

impl From<ResponseTypeArg> for ResponseType {
    fn from(arg: ResponseTypeArg) -> Self {
        match arg {
            ResponseTypeArg::Json => Self::Json,
            ResponseTypeArg::Text => Self::Text,
            ResponseTypeArg::Blob => Self::Blob,
            ResponseTypeArg::ArrayBuffer => Self::ArrayBuffer,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
