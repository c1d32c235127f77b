//! Request scheduler binding an adapter to the plugin pipeline.

use std::fmt;

use http::Method;

use crate::config::ConfigError;
use crate::pipeline::{ExecutionContext, Executor, PipelineError, Plugin};

use super::{Adapter, RequestConfig, Response, TransportError};

/// Error returned by [`RequestScheduler`] calls.
pub type SchedulerError = PipelineError<TransportError>;

/// Execution context seen by plugins installed on a [`RequestScheduler`].
pub type RequestContext = ExecutionContext<RequestConfig, Response, TransportError>;

/// Dispatches requests through an [`Adapter`] and an ordered plugin pipeline.
///
/// Every call merges its configuration over the adapter's defaults and runs
/// in its own [`ExecutionContext`], so plugin state such as retry counters is
/// never shared between calls.
///
/// # Example
///
/// ```no_run
/// use req_scheduler::plugins::RetryPlugin;
/// use req_scheduler::request::{ReqwestAdapter, RequestScheduler};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut scheduler = RequestScheduler::new(ReqwestAdapter::new());
/// scheduler.use_plugin(RetryPlugin::new(2))?;
///
/// let response = scheduler.get("https://api.example.com/health").await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
pub struct RequestScheduler<A> {
    adapter: A,
    executor: Executor<RequestConfig, Response, TransportError>,
}

impl<A: Adapter> RequestScheduler<A> {
    /// Creates a scheduler with no plugins.
    #[must_use]
    pub const fn new(adapter: A) -> Self {
        Self {
            adapter,
            executor: Executor::new(),
        }
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Installs a plugin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicatePlugin`] if a plugin with the same name
    /// is already installed.
    pub fn use_plugin<T>(&mut self, plugin: T) -> Result<&mut Self, ConfigError>
    where
        T: Plugin<RequestConfig, Response, TransportError> + 'static,
    {
        self.executor.use_plugin(plugin)?;
        Ok(self)
    }

    /// Returns true if a plugin with the given name is installed.
    #[must_use]
    pub fn has_plugin(&self, name: &str) -> bool {
        self.executor.has_plugin(name)
    }

    /// Removes the plugin with the given name, returning true if it existed.
    pub fn remove_plugin(&mut self, name: &str) -> bool {
        self.executor.remove_plugin(name)
    }

    /// Returns installed plugin names in invocation order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        self.executor.plugin_names()
    }

    /// Sends a request through the pipeline.
    ///
    /// `config` is merged over the adapter's defaults (see
    /// [`RequestConfig::merge`]) before any plugin runs.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Request`] if the adapter fails and no plugin
    ///   retries or recovers the failure
    /// - [`PipelineError::Hook`] if a plugin hook fails
    pub async fn request(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        let merged = RequestConfig::merge(self.adapter.config(), config.into());

        tracing::debug!(
            method = %merged.method_or_default(),
            url = merged.url.as_deref().unwrap_or_default(),
            "Scheduling request"
        );

        self.executor
            .exec(|parameters| self.adapter.request(parameters), merged)
            .await
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::GET, config).await
    }

    /// Sends a POST request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::POST, config).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::PUT, config).await
    }

    /// Sends a PATCH request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::PATCH, config).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::DELETE, config).await
    }

    /// Sends a HEAD request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn head(&self, config: impl Into<RequestConfig>) -> Result<Response, SchedulerError> {
        self.request_with(Method::HEAD, config).await
    }

    /// Sends an OPTIONS request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn options(
        &self,
        config: impl Into<RequestConfig>,
    ) -> Result<Response, SchedulerError> {
        self.request_with(Method::OPTIONS, config).await
    }

    async fn request_with(
        &self,
        method: Method,
        config: impl Into<RequestConfig>,
    ) -> Result<Response, SchedulerError> {
        self.request(config.into().with_method(method)).await
    }
}

impl<A: fmt::Debug> fmt::Debug for RequestScheduler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScheduler")
            .field("adapter", &self.adapter)
            .field("executor", &self.executor)
            .finish()
    }
}
