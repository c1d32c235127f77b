//! Tests for CLI vs TOML precedence rules.

use std::time::Duration;

use http::header::HeaderName;

use crate::request::ResponseType;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_url_overrides_toml() {
        let cli = cli(&["--url", "https://cli.example.com"]);
        let toml = toml(
            r#"
            [request]
            url = "https://toml.example.com"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.url, "https://cli.example.com");
    }

    #[test]
    fn cli_base_url_overrides_toml() {
        let cli = cli(&["--url", "items", "--base-url", "https://cli.example.com/"]);
        let toml = toml(
            r#"
            [adapter]
            base_url = "https://toml.example.com/"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(
            config.adapter_defaults().base_url.as_deref(),
            Some("https://cli.example.com/")
        );
    }

    #[test]
    fn cli_method_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "-X", "delete"]);
        let toml = toml(
            r#"
            [request]
            method = "PUT"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.method, Method::DELETE);
    }

    #[test]
    fn cli_response_type_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "--response-type", "text"]);
        let toml = toml(
            r#"
            [request]
            response_type = "json"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.response_type, Some(ResponseType::Text));
    }

    #[test]
    fn cli_data_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "-d", r#"{"from":"cli"}"#]);
        let toml = toml(
            r#"
            [request]
            data = { from = "toml" }
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.data, Some(serde_json::json!({ "from": "cli" })));
    }

    #[test]
    fn cli_token_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "--token", "cli-token"]);
        let toml = toml(
            r#"
            [common]
            token = "toml-token"
            token_prefix = "Bearer "
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.common.token.as_deref(), Some("cli-token"));
        assert_eq!(config.common.token_prefix.as_deref(), Some("Bearer "));
    }

    #[test]
    fn cli_timeout_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "--timeout", "5"]);
        let toml = toml(
            r#"
            [adapter]
            timeout = 60
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn cli_retry_max_overrides_toml() {
        let cli = cli(&["--url", "https://example.com", "--retry-max", "0"]);
        let toml = toml(
            r#"
            [retry]
            max_retries = 7
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.retry.max_retries, 0);
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_when_cli_silent() {
        let cli = cli(&[]);
        let toml = toml(
            r#"
            [adapter]
            timeout = 20

            [request]
            url = "https://example.com"
            method = "PATCH"
            response_type = "arrayBuffer"

            [common]
            token = "toml-token"
            token_header = "X-Auth"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.method, Method::PATCH);
        assert_eq!(config.timeout, Some(Duration::from_secs(20)));
        assert_eq!(config.response_type, Some(ResponseType::ArrayBuffer));
        assert_eq!(config.common.token.as_deref(), Some("toml-token"));
        assert_eq!(
            config.common.token_header,
            Some(HeaderName::from_static("x-auth"))
        );
    }

    #[test]
    fn defaults_used_when_both_silent() {
        let cli = cli(&["--url", "https://example.com"]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.method, Method::GET);
        assert_eq!(config.timeout, None);
        assert_eq!(config.response_type, None);
        assert_eq!(
            config.common.token_header,
            Some(http::header::AUTHORIZATION)
        );
        assert!(!config.common.required_token);
    }
}

mod headers {
    use super::*;

    #[test]
    fn cli_header_replaces_toml_header_of_same_name() {
        let cli = cli(&["--url", "https://example.com", "-H", "X-Env=cli"]);
        let toml = toml(
            r#"
            [request.headers]
            X-Env = "toml"
            X-Other = "kept"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.headers.get("x-env").unwrap(), "cli");
        assert_eq!(config.headers.get("x-other").unwrap(), "kept");
    }

    #[test]
    fn adapter_headers_are_kept_separate() {
        let cli = cli(&["--url", "https://example.com", "-H", "Accept: text/plain"]);
        let toml = toml(
            r#"
            [adapter.headers]
            Accept = "application/json"
            User-Agent = "req-scheduler"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.default_headers.get("accept").unwrap(), "application/json");
        assert_eq!(config.default_headers.get("user-agent").unwrap(), "req-scheduler");
        assert_eq!(config.headers.get("accept").unwrap(), "text/plain");
        assert!(config.headers.get("user-agent").is_none());
    }
}

mod boolean_flags {
    use super::*;

    #[test]
    fn require_token_from_toml_cannot_be_disabled_by_cli() {
        let cli = cli(&["--url", "https://example.com"]);
        let toml = toml(
            r#"
            [common]
            require_token = true
        "#,
        );

        let result = ValidatedConfig::from_raw(&cli, Some(&toml));

        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn require_token_from_cli_with_toml_token() {
        let cli = cli(&["--url", "https://example.com", "--require-token"]);
        let toml = toml(
            r#"
            [common]
            token = "secret"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert!(config.common.required_token);
    }

    #[test]
    fn logger_flags_come_from_cli() {
        let cli = cli(&["--url", "https://example.com", "--dry-run", "--ci", "-v", "-s"]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert!(config.logger.dry_run);
        assert!(config.logger.is_ci);
        assert!(config.logger.debug);
        assert!(config.logger.silent);
    }
}
