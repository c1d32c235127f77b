//! Per-call execution state.

use http::Extensions;

/// Mutable record threaded through one pipeline execution.
///
/// A fresh context is created for every call to
/// [`Executor::exec`](super::Executor::exec) and is owned exclusively by
/// that call. Plugins receive it by exclusive reference, so it is never
/// aliased across concurrent executions.
///
/// # Type Parameters
///
/// - `P`: task parameters (e.g. request configuration)
/// - `R`: value produced by the task
/// - `E`: error produced by the task
#[derive(Debug)]
pub struct ExecutionContext<P, R, E> {
    /// Parameters passed to the task on every attempt.
    ///
    /// `on_before` hooks may rewrite these; retries reuse the rewritten value.
    pub parameters: P,

    /// Result slot, populated when the task succeeds.
    ///
    /// `on_success` hooks may replace the value.
    pub return_value: Option<R>,

    pub(super) error: Option<E>,
    pub(super) attempts: u32,
    extensions: Extensions,
}

impl<P, R, E> ExecutionContext<P, R, E> {
    /// Creates a context for a new execution.
    #[must_use]
    pub fn new(parameters: P) -> Self {
        Self {
            parameters,
            return_value: None,
            error: None,
            attempts: 0,
            extensions: Extensions::new(),
        }
    }

    /// Returns the error from the most recent failed attempt.
    ///
    /// Set while `on_error` hooks run; cleared when an attempt succeeds.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Returns how many times the task has been invoked so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Typed storage for per-call plugin state.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to per-call plugin state.
    pub const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
