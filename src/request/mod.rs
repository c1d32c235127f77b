//! Request layer: configuration, responses, adapters and the scheduler.
//!
//! This module provides types and traits for:
//! - Describing requests ([`RequestConfig`], [`ResponseType`])
//! - Handling responses ([`Response`], [`Body`])
//! - Abstracting transports ([`Adapter`])
//! - Production adapter implementation ([`ReqwestAdapter`])
//! - Dispatching requests through plugins ([`RequestScheduler`])

mod adapter;
mod client;
mod config;
mod error;
mod response;
mod scheduler;

#[cfg(test)]
mod config_tests;

pub use adapter::Adapter;
pub use client::ReqwestAdapter;
pub use config::{RequestConfig, ResponseType};
pub use error::TransportError;
pub use response::{Body, Response};
pub use scheduler::{RequestContext, RequestScheduler, SchedulerError};
