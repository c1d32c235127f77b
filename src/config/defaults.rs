//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default HTTP method for requests.
pub const METHOD: &str = "GET";

/// Default maximum number of retries after the initial attempt.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default delay between retries in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Default maximum retry delay in milliseconds (exponential strategy).
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Default retry backoff multiplier (exponential strategy).
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default header carrying the auth token.
pub const TOKEN_HEADER: &str = "Authorization";

/// Default retry delay as Duration.
#[must_use]
pub const fn retry_delay() -> Duration {
    Duration::from_millis(RETRY_DELAY_MS)
}

/// Default maximum retry delay as Duration.
#[must_use]
pub const fn retry_max_delay() -> Duration {
    Duration::from_millis(RETRY_MAX_DELAY_MS)
}
