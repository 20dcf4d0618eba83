//! `update-order` function binary.
//!
//! Renames an existing order for `PUT`, `PATCH` or `UPDATE`.
//!
//! # Environment Variables
//!
//! See [`DatabaseSettings::from_env`](orders_functions::DatabaseSettings::from_env);
//! `LOG_FORMAT` and `RUST_LOG` control logging.

use orders_functions::infrastructure::runtime;
use orders_functions::{SqlSessionProvider, UpdateOrderFunction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::run::<UpdateOrderFunction<SqlSessionProvider>>().await
}
