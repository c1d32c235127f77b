//! Bounded retry plugin.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::pipeline::{ErrorAction, ExecutionContext, Plugin, PluginError};
use crate::request::TransportError;
use crate::time::{Sleeper, TokioSleeper};

/// Exponential backoff configuration.
///
/// The delay before retry `n` (0-indexed) is
/// `initial_delay * multiplier^n`, capped at `max_delay`.
///
/// # Defaults
///
/// - `initial_delay`: 1 second
/// - `max_delay`: 30 seconds
/// - `multiplier`: 2.0
///
/// # Example
///
/// ```
/// use req_scheduler::plugins::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::new()
///     .with_initial_delay(Duration::from_millis(100))
///     .with_max_delay(Duration::from_secs(5))
///     .with_multiplier(3.0);
///
/// assert_eq!(backoff.delay_for_retry(1), Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Delay before the first retry.
    ///
    /// Subsequent delays are computed by multiplying by `multiplier`.
    pub initial_delay: Duration,

    /// Maximum delay between retries.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry.
    pub multiplier: f64,
}

impl Backoff {
    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Creates a backoff with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }

    /// Sets the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive (must be > 0.0).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Computes the delay for a given retry number (0-indexed).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        // Safe cast: retry values are small (typically < 20) and i32::MAX is ~2 billion
        #[allow(clippy::cast_possible_wrap)]
        let multiplier = self.multiplier.powi(retry as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy for the wait between attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDelay {
    /// The same delay before every retry. Zero means no delay.
    Fixed(Duration),
    /// Exponentially growing delay.
    Exponential(Backoff),
}

impl RetryDelay {
    /// Computes the delay for a given retry number (0-indexed).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential(backoff) => backoff.delay_for_retry(retry),
        }
    }
}

impl Default for RetryDelay {
    fn default() -> Self {
        Self::Fixed(crate::config::defaults::retry_delay())
    }
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants another attempt. Used as the default predicate of
/// [`RetryPlugin::new`].
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for TransportError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // Server errors (5xx), rate limiting (429) and 408 are worth another try
            Self::Status { status, .. } => {
                status.is_server_error()
                    || *status == http::StatusCode::TOO_MANY_REQUESTS
                    || *status == http::StatusCode::REQUEST_TIMEOUT
            }
            // Configuration issues, not transient
            Self::InvalidUrl(_) | Self::Body(_) => false,
        }
    }
}

/// Predicate deciding whether a failure should be retried.
pub type ShouldRetry<P, R, E> = Arc<dyn Fn(&E, &ExecutionContext<P, R, E>) -> bool + Send + Sync>;

/// Per-call retry bookkeeping, stored in the context's extensions.
#[derive(Debug, Clone, Copy, Default)]
struct RetryState {
    retries: u32,
}

/// Plugin that re-runs failed tasks up to a fixed bound.
///
/// `max_retries = N` permits at most `N` additional attempts after the
/// initial one. The retry counter lives in each call's
/// [`ExecutionContext`], so it starts at zero for every top-level call.
///
/// On each failure the plugin:
/// 1. Declines if the counter has reached `max_retries`.
/// 2. Declines if the predicate rejects the error.
/// 3. Otherwise increments the counter, sleeps the configured delay and
///    asks the executor to retry.
///
/// # Type Parameters
///
/// - `P`, `R`, `E`: the executor's parameter, result and error types
/// - `S`: the sleeper used for delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use req_scheduler::plugins::{RetryDelay, RetryPlugin};
/// use req_scheduler::request::{RequestConfig, Response, TransportError};
/// use std::time::Duration;
///
/// let retry: RetryPlugin<RequestConfig, Response, TransportError> = RetryPlugin::new(3)
///     .with_delay(RetryDelay::Fixed(Duration::from_millis(250)));
///
/// assert_eq!(retry.max_retries(), 3);
/// ```
pub struct RetryPlugin<P, R, E, S = TokioSleeper> {
    max_retries: u32,
    delay: RetryDelay,
    should_retry: ShouldRetry<P, R, E>,
    sleeper: S,
}

impl<P, R, E> RetryPlugin<P, R, E, TokioSleeper> {
    /// Creates a retry plugin with a custom predicate.
    ///
    /// Uses the default delay and [`TokioSleeper`].
    #[must_use]
    pub fn with_predicate<F>(max_retries: u32, should_retry: F) -> Self
    where
        F: Fn(&E, &ExecutionContext<P, R, E>) -> bool + Send + Sync + 'static,
    {
        Self {
            max_retries,
            delay: RetryDelay::default(),
            should_retry: Arc::new(should_retry),
            sleeper: TokioSleeper,
        }
    }
}

impl<P, R, E> RetryPlugin<P, R, E, TokioSleeper>
where
    P: 'static,
    R: 'static,
    E: IsRetryable + 'static,
{
    /// Creates a retry plugin that retries transient errors.
    ///
    /// Transient errors are those for which [`IsRetryable::is_retryable`]
    /// returns true.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self::with_predicate(max_retries, |error: &E, _ctx: &ExecutionContext<P, R, E>| {
            error.is_retryable()
        })
    }
}

impl<P, R, E, S> RetryPlugin<P, R, E, S> {
    /// Plugin name used for duplicate detection.
    pub const NAME: &'static str = "RetryPlugin";

    /// Sets the delay strategy.
    #[must_use]
    pub fn with_delay(mut self, delay: RetryDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the retry predicate.
    #[must_use]
    pub fn with_should_retry<F>(mut self, should_retry: F) -> Self
    where
        F: Fn(&E, &ExecutionContext<P, R, E>) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(should_retry);
        self
    }

    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryPlugin<P, R, E, S2> {
        RetryPlugin {
            max_retries: self.max_retries,
            delay: self.delay,
            should_retry: self.should_retry,
            sleeper,
        }
    }

    /// Returns the maximum number of additional attempts.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the delay strategy.
    #[must_use]
    pub const fn delay(&self) -> &RetryDelay {
        &self.delay
    }
}

impl<P, R, E, S: fmt::Debug> fmt::Debug for RetryPlugin<P, R, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPlugin")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .field("sleeper", &self.sleeper)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P, R, E, S> Plugin<P, R, E> for RetryPlugin<P, R, E, S>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
    E: Send + Sync + 'static,
    S: Sleeper + 'static,
{
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_error(
        &self,
        ctx: &mut ExecutionContext<P, R, E>,
    ) -> Result<ErrorAction<R>, PluginError> {
        let retries = ctx.extensions().get::<RetryState>().map_or(0, |s| s.retries);

        if retries >= self.max_retries {
            tracing::debug!(retries, max_retries = self.max_retries, "Retry budget exhausted");
            return Ok(ErrorAction::Continue);
        }

        let Some(error) = ctx.error() else {
            return Ok(ErrorAction::Continue);
        };
        if !(self.should_retry)(error, ctx) {
            return Ok(ErrorAction::Continue);
        }

        ctx.extensions_mut().insert(RetryState {
            retries: retries + 1,
        });

        let delay = self.delay.delay_for_retry(retries);
        tracing::warn!(
            retry = retries + 1,
            max_retries = self.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Retrying failed task"
        );
        self.sleeper.sleep(delay).await;

        Ok(ErrorAction::Retry)
    }
}
