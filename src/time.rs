//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows retry delays to be
//! skipped in tests while using the tokio timer in production.

use std::future::Future;
use std::time::Duration;

/// Abstraction over asynchronous sleeping.
///
/// Retry plugins suspend between attempts through this trait so tests can
/// inject [`InstantSleeper`] instead of waiting on the real clock.
///
/// # Example
///
/// ```
/// use req_scheduler::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// // Returns immediately.
/// rt.block_on(InstantSleeper.sleep(Duration::from_secs(60)));
/// ```
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately regardless of the requested duration.
///
/// Intended for tests that exercise retry paths without real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
