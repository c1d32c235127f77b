//! Transport adapter trait.

use super::{RequestConfig, Response, TransportError};

/// Trait for sending one request and returning one response.
///
/// # Design
///
/// This trait abstracts the transport, enabling:
/// - Dependency injection for testing with mock adapters
/// - Swapping HTTP libraries without changing calling code
/// - Sharing one set of default settings across every call on a scheduler
///
/// Adapters hold their defaults as read-only state; the scheduler merges
/// each call over [`config`](Adapter::config) and never mutates it.
///
/// # Example
///
/// ```
/// use req_scheduler::request::{Adapter, Body, RequestConfig, Response, TransportError};
///
/// struct EchoAdapter {
///     defaults: RequestConfig,
/// }
///
/// impl Adapter for EchoAdapter {
///     fn config(&self) -> &RequestConfig {
///         &self.defaults
///     }
///
///     async fn request(&self, config: RequestConfig) -> Result<Response, TransportError> {
///         let data = config.data.clone().map_or(Body::Empty, Body::Json);
///         Ok(Response::new(http::StatusCode::OK, http::HeaderMap::new(), data, config))
///     }
/// }
/// ```
pub trait Adapter: Send + Sync {
    /// Returns the default configuration every call is merged over.
    fn config(&self) -> &RequestConfig;

    /// Sends a request and returns the response.
    ///
    /// # Arguments
    ///
    /// * `config` - The fully merged request configuration
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request cannot be completed.
    fn request(
        &self,
        config: RequestConfig,
    ) -> impl std::future::Future<Output = Result<Response, TransportError>> + Send;
}
