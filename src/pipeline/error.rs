//! Error types for pipeline execution.

use std::fmt;

use thiserror::Error;

/// Boxed error type used by plugins to report arbitrary failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal failure of the task itself.
///
/// Carries the last error the task produced, unchanged, along with the
/// number of times the task was invoked before the pipeline gave up.
#[derive(Debug, Error)]
#[error("Request failed after {attempts} attempt(s): {cause}")]
pub struct RequestError<E> {
    #[source]
    cause: E,
    attempts: u32,
}

impl<E> RequestError<E> {
    /// Creates a request error from the last task failure.
    #[must_use]
    pub const fn new(cause: E, attempts: u32) -> Self {
        Self { cause, attempts }
    }

    /// Returns the error produced by the final attempt.
    #[must_use]
    pub const fn cause(&self) -> &E {
        &self.cause
    }

    /// Consumes the error, returning the original cause.
    #[must_use]
    pub fn into_cause(self) -> E {
        self.cause
    }

    /// Returns how many times the task was invoked.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Phase of the pipeline in which a hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// `on_before`, before the task is invoked.
    Before,
    /// `on_success`, after the task produced a value.
    Success,
    /// `on_error`, after the task failed.
    Error,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Before => "on_before",
            Self::Success => "on_success",
            Self::Error => "on_error",
        };
        f.write_str(name)
    }
}

/// Error raised by a plugin hook.
///
/// Hook errors are programming or data errors, not transport failures:
/// the executor never offers them to `on_error` and never retries them.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A header name or value could not be constructed.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] BoxError),

    /// The response body could not be decoded as the declared type.
    #[error("Failed to decode response body as {kind}: {reason}")]
    Decode {
        /// Declared response type
        kind: &'static str,
        /// Reason for the failure
        reason: String,
    },

    /// A success hook left the context without a return value.
    #[error("Return value was removed from the execution context")]
    MissingReturnValue,

    /// Any other plugin-specific failure.
    #[error(transparent)]
    Other(#[from] BoxError),
}

/// Error returned by [`Executor::exec`](super::Executor::exec).
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    /// The task failed and no plugin retried or recovered it.
    #[error(transparent)]
    Request(#[from] RequestError<E>),

    /// A plugin hook returned an error, aborting the call.
    #[error("Plugin '{plugin}' failed in {phase}: {source}")]
    Hook {
        /// Name of the failing plugin
        plugin: String,
        /// Hook phase that failed
        phase: HookPhase,
        /// Underlying hook error
        #[source]
        source: PluginError,
    },
}

impl<E> PipelineError<E> {
    /// Returns the task error if this is a request failure.
    #[must_use]
    pub const fn request_cause(&self) -> Option<&E> {
        match self {
            Self::Request(e) => Some(e.cause()),
            Self::Hook { .. } => None,
        }
    }

    /// Returns true if the failure came from a plugin hook.
    #[must_use]
    pub const fn is_hook_error(&self) -> bool {
        matches!(self, Self::Hook { .. })
    }

    pub(super) fn hook(plugin: &str, phase: HookPhase, source: PluginError) -> Self {
        Self::Hook {
            plugin: plugin.to_string(),
            phase,
            source,
        }
    }
}
