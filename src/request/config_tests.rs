//! Tests for request configuration merging and URL resolution.

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use http::Method;
use serde_json::json;

use super::{RequestConfig, ResponseType, TransportError};

mod merge {
    use super::*;

    #[test]
    fn call_values_win_over_defaults() {
        let defaults = RequestConfig::new()
            .with_base_url("https://api.example.com/")
            .with_method(Method::GET)
            .with_data("D")
            .with_timeout(Duration::from_secs(30));
        let call = RequestConfig::new()
            .with_url("items")
            .with_method(Method::POST)
            .with_data("E");

        let merged = RequestConfig::merge(&defaults, call);

        assert_eq!(merged.base_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(merged.url.as_deref(), Some("items"));
        assert_eq!(merged.method, Some(Method::POST));
        assert_eq!(merged.data, Some(json!("E")));
        assert_eq!(merged.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn defaults_fill_unset_call_fields() {
        let defaults = RequestConfig::new()
            .with_data("D")
            .with_response_type(ResponseType::Text);

        let merged = RequestConfig::merge(&defaults, RequestConfig::new());

        assert_eq!(merged.data, Some(json!("D")));
        assert_eq!(merged.response_type, Some(ResponseType::Text));
    }

    #[test]
    fn headers_merge_by_name() {
        let mut defaults = RequestConfig::new()
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("default"));
        defaults
            .headers
            .append(ACCEPT, HeaderValue::from_static("text/plain"));
        let call = RequestConfig::new().with_header(ACCEPT, HeaderValue::from_static("image/png"));

        let merged = RequestConfig::merge(&defaults, call);

        let accept: Vec<_> = merged.headers.get_all(ACCEPT).iter().collect();
        assert_eq!(accept, ["image/png"]);
        assert_eq!(merged.headers.get(AUTHORIZATION).unwrap(), "default");
    }

    #[test]
    fn defaults_are_not_modified() {
        let defaults = RequestConfig::new().with_data("D");
        let snapshot = defaults.clone();

        let _ = RequestConfig::merge(&defaults, RequestConfig::new().with_data("E"));

        assert_eq!(defaults, snapshot);
    }

    #[test]
    fn method_defaults_to_get() {
        assert_eq!(RequestConfig::new().method_or_default(), Method::GET);
        assert_eq!(
            RequestConfig::new()
                .with_method(Method::HEAD)
                .method_or_default(),
            Method::HEAD
        );
    }
}

mod resolve_url {
    use super::*;

    #[test]
    fn absolute_url_ignores_base() {
        let config = RequestConfig::new()
            .with_base_url("https://base.example.com/")
            .with_url("https://other.example.com/x");

        assert_eq!(
            config.resolve_url().unwrap().as_str(),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn relative_url_is_appended_after_last_slash() {
        let config = RequestConfig::new()
            .with_base_url("https://api.example.com/v1/")
            .with_url("users/7");

        assert_eq!(
            config.resolve_url().unwrap().as_str(),
            "https://api.example.com/v1/users/7"
        );
    }

    #[test]
    fn rooted_url_replaces_base_path() {
        let config = RequestConfig::new()
            .with_base_url("https://api.example.com/v1/")
            .with_url("/health");

        assert_eq!(
            config.resolve_url().unwrap().as_str(),
            "https://api.example.com/health"
        );
    }

    #[test]
    fn relative_url_without_base_is_invalid() {
        let config = RequestConfig::from("users");

        assert!(matches!(config.resolve_url(), Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn malformed_url_is_invalid() {
        let config = RequestConfig::from("http://[::1");

        assert!(matches!(config.resolve_url(), Err(TransportError::InvalidUrl(_))));
    }
}

mod response_type {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("JSON".parse::<ResponseType>(), Ok(ResponseType::Json));
        assert_eq!("text".parse::<ResponseType>(), Ok(ResponseType::Text));
        assert_eq!("Blob".parse::<ResponseType>(), Ok(ResponseType::Blob));
        assert_eq!("arrayBuffer".parse::<ResponseType>(), Ok(ResponseType::ArrayBuffer));
        assert_eq!("array_buffer".parse::<ResponseType>(), Ok(ResponseType::ArrayBuffer));
    }

    #[test]
    fn rejects_unknown() {
        assert!("xml".parse::<ResponseType>().is_err());
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(ResponseType::ArrayBuffer.to_string(), "arrayBuffer");
        assert_eq!(ResponseType::Json.as_str(), "json");
    }
}
