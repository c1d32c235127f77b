//! Built-in plugins for [`RequestScheduler`](crate::request::RequestScheduler).
//!
//! - [`RetryPlugin`]: bounded retry with fixed or exponential delay
//! - [`CommonConfigPlugin`]: default headers, auth token, default body and
//!   response decoding

mod common;
mod retry;


pub use common::{BodySerializer, CommonConfigOptions, CommonConfigPlugin};
pub use retry::{Backoff, IsRetryable, RetryDelay, RetryPlugin, ShouldRetry};
