//! Tests for retry settings resolution.

use std::time::Duration;

use crate::plugins::RetryDelay;

use super::*;

#[test]
fn defaults_to_fixed_delay() {
    let cli = cli(&["--url", "https://example.com"]);

    let config = ValidatedConfig::from_raw(&cli, None).unwrap();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.delay, RetryDelay::Fixed(Duration::from_secs(1)));
}

#[test]
fn cli_delay_overrides_toml() {
    let cli = cli(&["--url", "https://example.com", "--retry-delay-ms", "0"]);
    let toml = toml(
        r#"
        [retry]
        delay_ms = 500
    "#,
    );

    let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

    assert_eq!(config.retry.delay, RetryDelay::Fixed(Duration::ZERO));
}

#[test]
fn exponential_strategy_builds_backoff() {
    let cli = cli(&["--url", "https://example.com"]);
    let toml = toml(
        r#"
        [retry]
        strategy = "Exponential"
        delay_ms = 100
        max_delay_ms = 1000
        multiplier = 3.0
    "#,
    );

    let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

    let RetryDelay::Exponential(backoff) = &config.retry.delay else {
        panic!("expected exponential delay, got {:?}", config.retry.delay);
    };
    assert_eq!(backoff.initial_delay, Duration::from_millis(100));
    assert_eq!(backoff.max_delay, Duration::from_secs(1));
    assert_eq!(config.retry.delay.delay_for_retry(1), Duration::from_millis(300));
    assert_eq!(config.retry.delay.delay_for_retry(5), Duration::from_secs(1));
}

#[test]
fn unknown_strategy_is_rejected() {
    let cli = cli(&["--url", "https://example.com"]);
    let toml = toml(
        r#"
        [retry]
        strategy = "linear"
    "#,
    );

    let result = ValidatedConfig::from_raw(&cli, Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
}

#[test]
fn non_positive_multiplier_is_rejected() {
    let cli = cli(&["--url", "https://example.com"]);
    let toml = toml(
        r#"
        [retry]
        strategy = "exponential"
        multiplier = 0.0
    "#,
    );

    let result = ValidatedConfig::from_raw(&cli, Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
}

#[test]
fn max_delay_below_initial_is_rejected() {
    let cli = cli(&["--url", "https://example.com", "--retry-delay-ms", "5000"]);
    let toml = toml(
        r#"
        [retry]
        strategy = "exponential"
        max_delay_ms = 1000
    "#,
    );

    let result = ValidatedConfig::from_raw(&cli, Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
}

#[test]
fn fixed_strategy_ignores_exponential_fields() {
    let cli = cli(&["--url", "https://example.com"]);
    let toml = toml(
        r#"
        [retry]
        strategy = "fixed"
        delay_ms = 250
        multiplier = -1.0
    "#,
    );

    let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

    assert_eq!(config.retry.delay, RetryDelay::Fixed(Duration::from_millis(250)));
}
