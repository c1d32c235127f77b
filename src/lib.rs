//! req-scheduler: a pluggable task pipeline with an HTTP request scheduler.
//!
//! The [`pipeline::Executor`] runs an async task through ordered plugin
//! hooks (`on_before`, `on_success`, `on_error`). The
//! [`request::RequestScheduler`] specialises it for HTTP-like requests
//! sent through an [`request::Adapter`], and [`plugins`] provides bounded
//! retry and common request shaping.

pub mod config;
pub mod logger;
pub mod pipeline;
pub mod plugins;
pub mod request;
pub mod time;
