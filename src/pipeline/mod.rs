//! Generic plugin pipeline for running tasks with lifecycle hooks.
//!
//! This module provides:
//! - Per-call state ([`ExecutionContext`])
//! - The plugin capability trait ([`Plugin`], [`ErrorAction`])
//! - The ordered pipeline engine ([`Executor`])
//! - Pipeline error types ([`PipelineError`], [`RequestError`], [`PluginError`])

mod context;
mod error;
mod executor;
mod plugin;


pub use context::ExecutionContext;
pub use error::{BoxError, HookPhase, PipelineError, PluginError, RequestError};
pub use executor::Executor;
pub use plugin::{ErrorAction, Plugin};
