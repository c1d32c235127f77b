//! Application execution logic.
//!
//! This module wires a validated configuration into a request scheduler,
//! sends the configured request and prints the response.

use std::sync::Arc;

use http::{HeaderMap, StatusCode};
use serde_json::Value;
use thiserror::Error;

use req_scheduler::config::{ConfigError, ValidatedConfig};
use req_scheduler::logger::Logger;
use req_scheduler::plugins::{CommonConfigPlugin, RetryPlugin};
use req_scheduler::request::{
    Adapter, Body, RequestConfig, RequestScheduler, ReqwestAdapter, Response, SchedulerError,
    TransportError,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to assemble the plugin pipeline.
    #[error("Failed to set up plugins: {0}")]
    Setup(#[from] ConfigError),

    /// The request failed after all plugins ran.
    #[error("Request failed: {0}")]
    Request(#[from] SchedulerError),
}

/// Executes the configured request.
///
/// This function:
/// 1. Picks the production adapter, or the echoing adapter in dry-run mode
/// 2. Installs the common-config and retry plugins
/// 3. Sends the request and prints the response body
///
/// # Errors
///
/// Returns an error if plugin setup fails or the request fails.
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let logger = Arc::new(Logger::new(config.logger));

    if config.logger.dry_run {
        tracing::info!("Dry-run mode enabled - the request will be printed but not sent");
        let adapter = DryRunAdapter::new(config.adapter_defaults(), Arc::clone(&logger));
        let scheduler = build_scheduler(adapter, &config)?;
        scheduler.request(config.request()).await?;
        logger.obtrusive("Dry run: nothing was sent");
        return Ok(());
    }

    let adapter = ReqwestAdapter::new().with_defaults(config.adapter_defaults());
    let scheduler = build_scheduler(adapter, &config)?;
    let response = scheduler.request(config.request()).await?;
    print_response(&logger, &response);

    Ok(())
}

/// Creates a scheduler with the plugins described by `config`.
///
/// The common-config plugin is always installed; the retry plugin only when
/// `max_retries` is positive.
///
/// # Errors
///
/// Returns an error if the token configuration is invalid.
pub fn build_scheduler<A: Adapter>(
    adapter: A,
    config: &ValidatedConfig,
) -> Result<RequestScheduler<A>, ConfigError> {
    let mut scheduler = RequestScheduler::new(adapter);

    scheduler.use_plugin(CommonConfigPlugin::new(config.common.clone())?)?;

    if config.retry.max_retries > 0 {
        let retry = RetryPlugin::<RequestConfig, Response, TransportError>::new(
            config.retry.max_retries,
        )
        .with_delay(config.retry.delay.clone());
        scheduler.use_plugin(retry)?;
    }

    tracing::debug!(plugins = ?scheduler.plugin_names(), "Scheduler ready");
    Ok(scheduler)
}

/// Prints status and headers (verbose only) followed by the body.
fn print_response(logger: &Logger, response: &Response) {
    logger.debug(format_args!("{} {}", response.status.as_u16(), response.status_text));
    for (name, value) in &response.headers {
        logger.verbose(format_args!("{name}: {}", value.to_str().unwrap_or("<binary>")));
    }

    if let Some(body) = render_body(&response.data) {
        logger.log(body);
    }
}

/// Renders a body for the console; `None` for an empty body.
fn render_body(body: &Body) -> Option<String> {
    match body {
        Body::Empty => None,
        Body::Text(text) => Some(text.clone()),
        Body::Json(Value::Null) => Some("null".to_string()),
        Body::Json(value) => {
            Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        }
        Body::Bytes(bytes) => Some(
            std::str::from_utf8(bytes)
                .map_or_else(|_| format!("<{} bytes of binary data>", bytes.len()), str::to_string),
        ),
    }
}

/// Adapter that prints the request as a `curl` command instead of sending it.
///
/// Responds with an empty `200 OK` so the rest of the pipeline runs as usual.
struct DryRunAdapter {
    defaults: RequestConfig,
    logger: Arc<Logger>,
}

impl DryRunAdapter {
    const fn new(defaults: RequestConfig, logger: Arc<Logger>) -> Self {
        Self { defaults, logger }
    }
}

impl Adapter for DryRunAdapter {
    fn config(&self) -> &RequestConfig {
        &self.defaults
    }

    async fn request(&self, config: RequestConfig) -> Result<Response, TransportError> {
        let args = curl_args(&config)?;
        self.logger.exec(&args);
        Ok(Response::new(StatusCode::OK, HeaderMap::new(), Body::Empty, config))
    }
}

/// Builds the `curl` invocation equivalent to `config`.
///
/// Sensitive header values are redacted.
fn curl_args(config: &RequestConfig) -> Result<Vec<String>, TransportError> {
    let url = config.resolve_url()?;
    let mut args = vec![
        "curl".to_string(),
        "-X".to_string(),
        config.method_or_default().to_string(),
        url.to_string(),
    ];

    for (name, value) in &config.headers {
        let shown = if value.is_sensitive() {
            "<redacted>"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        args.push("-H".to_string());
        args.push(format!("{name}: {shown}"));
    }

    if let Some(timeout) = config.timeout {
        args.push("--max-time".to_string());
        args.push(timeout.as_secs().to_string());
    }

    match &config.data {
        None => {}
        Some(Value::String(text)) => {
            args.push("-d".to_string());
            args.push(text.clone());
        }
        Some(data) => {
            args.push("-d".to_string());
            args.push(data.to_string());
        }
    }

    Ok(args)
}
