//! Infrastructure Layer
//!
//! Adapters around the application layer: configuration, credentials, the
//! SQL session provider, the invocation event, the function handlers and
//! their runtimes.

pub mod auth;
pub mod config;
pub mod functions;
pub mod http;
pub mod local;
pub mod persistence;
pub mod runtime;
pub mod telemetry;
