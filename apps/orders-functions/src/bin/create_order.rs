//! `create-order` function binary.
//!
//! Inserts one order from a `POST` body.
//!
//! # Environment Variables
//!
//! See [`DatabaseSettings::from_env`](orders_functions::DatabaseSettings::from_env);
//! `LOG_FORMAT` and `RUST_LOG` control logging.

use orders_functions::infrastructure::runtime;
use orders_functions::{CreateOrderFunction, SqlSessionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::run::<CreateOrderFunction<SqlSessionProvider>>().await
}
