// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Orders Functions - Serverless CRUD Library
//!
//! Shared library behind the four order functions (create, read, update,
//! delete). Each function is a single-shot transform: check the method,
//! validate the event, run one parameterized statement in a scoped session,
//! and map the outcome to a `{statusCode, body}` envelope.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: `Order`, `OrderId`, typed column values, validation
//! - **Application**: session port, scoped session helper, one use case per
//!   operation
//! - **Infrastructure**: configuration, credentials, SQL session provider
//!   (SQLite, Postgres), invocation event, function handlers, function
//!   runtime, local development server
//!
//! # Binaries
//!
//! - `create-order`, `get-orders`, `update-order`, `delete-order`: one
//!   deployable function each
//! - `orders-local`: all four behind one HTTP server

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Order record and typed values.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and runtimes.
pub mod infrastructure;

/// Handler errors and their responses.
pub mod error;

pub use application::OrderError;
pub use application::ports::{Session, SessionProvider, StoreError};
pub use domain::{Order, OrderId, ValidationError};
pub use error::ApiError;
pub use infrastructure::config::{ConfigError, DatabaseSettings};
pub use infrastructure::functions::{
    CreateOrderFunction, DeleteOrderFunction, GetOrdersFunction, OrderFunction, OrderFunctions,
    UpdateOrderFunction,
};
pub use infrastructure::http::{HttpEvent, HttpMethod, HttpResponse};
pub use infrastructure::persistence::SqlSessionProvider;
