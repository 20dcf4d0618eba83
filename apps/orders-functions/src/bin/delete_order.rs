//! `delete-order` function binary.
//!
//! Deletes the order named by the `id` query parameter for `DELETE`.
//!
//! # Environment Variables
//!
//! See [`DatabaseSettings::from_env`](orders_functions::DatabaseSettings::from_env);
//! `LOG_FORMAT` and `RUST_LOG` control logging.

use orders_functions::infrastructure::runtime;
use orders_functions::{DeleteOrderFunction, SqlSessionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::run::<DeleteOrderFunction<SqlSessionProvider>>().await
}
