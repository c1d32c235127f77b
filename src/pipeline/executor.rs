//! Ordered plugin pipeline engine.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::config::ConfigError;

use super::{
    ErrorAction, ExecutionContext, HookPhase, PipelineError, Plugin, PluginError, RequestError,
};

/// Runs tasks through an ordered sequence of plugins.
///
/// Each call to [`exec`](Self::exec) proceeds as:
///
/// 1. `on_before` of every enabled plugin, in registration order.
/// 2. The task, invoked with a clone of the (possibly rewritten) parameters.
/// 3. On success, `on_success` of every enabled plugin, in registration order.
/// 4. On failure, `on_error` of each enabled plugin, in registration order,
///    until one returns [`ErrorAction::Retry`] (back to step 2) or
///    [`ErrorAction::Recover`]. If none claims the error, the call fails with
///    the last task error.
///
/// `on_before` hooks always all run; a plugin cannot short-circuit the
/// remaining ones except by returning an error. Hook errors abort the call
/// immediately and are never routed through `on_error`.
///
/// The plugin list is only mutable through `&mut self`, so it cannot change
/// while an execution holds `&self`.
pub struct Executor<P, R, E>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    plugins: Vec<Arc<dyn Plugin<P, R, E>>>,
}

impl<P, R, E> Executor<P, R, E>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Creates an executor with no plugins.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Appends a plugin to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicatePlugin`] if a plugin with the same name
    /// is already registered. The existing plugin stays in place.
    pub fn use_plugin<T>(&mut self, plugin: T) -> Result<&mut Self, ConfigError>
    where
        T: Plugin<P, R, E> + 'static,
    {
        self.use_shared(Arc::new(plugin))
    }

    /// Appends an already shared plugin to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicatePlugin`] if a plugin with the same name
    /// is already registered.
    pub fn use_shared(
        &mut self,
        plugin: Arc<dyn Plugin<P, R, E>>,
    ) -> Result<&mut Self, ConfigError> {
        if self.has_plugin(plugin.name()) {
            return Err(ConfigError::DuplicatePlugin {
                name: plugin.name().to_string(),
            });
        }

        tracing::debug!(plugin = plugin.name(), "Registered plugin");
        self.plugins.push(plugin);
        Ok(self)
    }

    /// Returns true if a plugin with the given name is registered.
    #[must_use]
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    /// Removes the plugin with the given name.
    ///
    /// Returns true if a plugin was removed.
    pub fn remove_plugin(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|p| p.name() != name);
        self.plugins.len() != before
    }

    /// Returns registered plugin names in invocation order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Runs `task` through the plugin pipeline.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Request`] when the task fails and no plugin retries
    ///   or recovers it; carries the last task error unchanged.
    /// - [`PipelineError::Hook`] when any plugin hook returns an error.
    pub async fn exec<F, Fut>(&self, task: F, parameters: P) -> Result<R, PipelineError<E>>
    where
        P: Clone,
        F: Fn(P) -> Fut + Send + Sync,
        Fut: Future<Output = Result<R, E>> + Send,
    {
        let mut ctx = ExecutionContext::new(parameters);

        self.run_before(&mut ctx).await?;

        loop {
            ctx.attempts += 1;

            match task(ctx.parameters.clone()).await {
                Ok(value) => {
                    ctx.error = None;
                    ctx.return_value = Some(value);
                    return self.run_success(ctx).await;
                }
                Err(error) => {
                    tracing::debug!(attempt = ctx.attempts, "Task attempt failed");
                    ctx.error = Some(error);

                    match self.run_error(&mut ctx).await? {
                        ErrorAction::Retry => {}
                        ErrorAction::Recover(value) => return Ok(value),
                        ErrorAction::Continue => {
                            let cause = ctx
                                .error
                                .take()
                                .expect("error slot is only cleared by the executor");
                            return Err(RequestError::new(cause, ctx.attempts).into());
                        }
                    }
                }
            }
        }
    }

    async fn run_before(
        &self,
        ctx: &mut ExecutionContext<P, R, E>,
    ) -> Result<(), PipelineError<E>> {
        for plugin in &self.plugins {
            if !plugin.enabled(ctx) {
                continue;
            }
            plugin
                .on_before(ctx)
                .await
                .map_err(|e| PipelineError::hook(plugin.name(), HookPhase::Before, e))?;
        }
        Ok(())
    }

    async fn run_success(
        &self,
        mut ctx: ExecutionContext<P, R, E>,
    ) -> Result<R, PipelineError<E>> {
        let mut last_plugin: Option<&str> = None;

        for plugin in &self.plugins {
            if !plugin.enabled(&ctx) {
                continue;
            }
            plugin
                .on_success(&mut ctx)
                .await
                .map_err(|e| PipelineError::hook(plugin.name(), HookPhase::Success, e))?;
            last_plugin = Some(plugin.name());

            if ctx.return_value.is_none() {
                break;
            }
        }

        ctx.return_value.ok_or_else(|| {
            PipelineError::hook(
                last_plugin.unwrap_or_default(),
                HookPhase::Success,
                PluginError::MissingReturnValue,
            )
        })
    }

    async fn run_error(
        &self,
        ctx: &mut ExecutionContext<P, R, E>,
    ) -> Result<ErrorAction<R>, PipelineError<E>> {
        for plugin in &self.plugins {
            if !plugin.enabled(ctx) {
                continue;
            }
            let action = plugin
                .on_error(ctx)
                .await
                .map_err(|e| PipelineError::hook(plugin.name(), HookPhase::Error, e))?;

            match action {
                ErrorAction::Continue => {}
                ErrorAction::Retry => {
                    tracing::debug!(plugin = plugin.name(), "Plugin requested retry");
                    return Ok(ErrorAction::Retry);
                }
                ErrorAction::Recover(value) => {
                    tracing::debug!(plugin = plugin.name(), "Plugin recovered failed task");
                    return Ok(ErrorAction::Recover(value));
                }
            }
        }
        Ok(ErrorAction::Continue)
    }
}

impl<P, R, E> Default for Executor<P, R, E>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R, E> fmt::Debug for Executor<P, R, E>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
