//! Configuration layer for req-scheduler.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The request `url` has no default and must come from CLI or TOML.
//!
//! Request headers are merged per name: TOML `[request.headers]` first, then
//! every `--header` flag, which replaces a TOML value of the same name.
//! Adapter default headers come from TOML only.
//!
//! # Boolean Flag Semantics
//!
//! `--require-token` uses OR semantics: if set `true` in either CLI or TOML,
//! the result is `true`. Flags only enable, never disable.
//!
//! # TOML-Only Options
//!
//! - `retry.strategy` (default: fixed)
//! - `retry.max_delay_ms` and `retry.multiplier` (exponential strategy only)
//! - `common.default_body`
//! - `adapter.headers`

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, ResponseTypeArg};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{RetrySettings, ValidatedConfig, write_default_config};
