//! Plugin capability trait.

use async_trait::async_trait;

use super::{ExecutionContext, PluginError};

/// Outcome of an `on_error` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorAction<R> {
    /// Not handled; the error is offered to the next plugin.
    Continue,
    /// Re-invoke the task with the current parameters.
    Retry,
    /// Complete the call successfully with a substitute value.
    Recover(R),
}

/// A unit of cross-cutting behavior attached to an [`Executor`](super::Executor).
///
/// Every hook is optional: the default implementations do nothing, so a
/// plugin only overrides the phases it cares about. Hooks run strictly in
/// registration order and are awaited one at a time.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use req_scheduler::pipeline::{ExecutionContext, Plugin, PluginError};
///
/// struct Uppercase;
///
/// #[async_trait]
/// impl Plugin<String, String, std::io::Error> for Uppercase {
///     fn name(&self) -> &str {
///         "Uppercase"
///     }
///
///     async fn on_success(
///         &self,
///         ctx: &mut ExecutionContext<String, String, std::io::Error>,
///     ) -> Result<(), PluginError> {
///         if let Some(value) = ctx.return_value.as_mut() {
///             *value = value.to_uppercase();
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Plugin<P, R, E>: Send + Sync
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Stable identity used to reject duplicate registrations.
    fn name(&self) -> &str;

    /// Whether this plugin participates in the given execution.
    ///
    /// Checked before every hook invocation.
    fn enabled(&self, _ctx: &ExecutionContext<P, R, E>) -> bool {
        true
    }

    /// Runs before the task; may rewrite `ctx.parameters`.
    ///
    /// # Errors
    ///
    /// An error aborts the call without invoking the task.
    async fn on_before(&self, _ctx: &mut ExecutionContext<P, R, E>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Runs after the task succeeds; may replace `ctx.return_value`.
    ///
    /// # Errors
    ///
    /// An error aborts the call; remaining hooks are skipped.
    async fn on_success(&self, _ctx: &mut ExecutionContext<P, R, E>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Runs after the task fails; the failure is available via `ctx.error()`.
    ///
    /// # Errors
    ///
    /// An error aborts the call; the task failure is discarded.
    async fn on_error(
        &self,
        _ctx: &mut ExecutionContext<P, R, E>,
    ) -> Result<ErrorAction<R>, PluginError> {
        Ok(ErrorAction::Continue)
    }
}
