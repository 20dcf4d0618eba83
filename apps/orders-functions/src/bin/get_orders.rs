//! `get-orders` function binary.
//!
//! Lists every order for a `GET`.
//!
//! # Environment Variables
//!
//! See [`DatabaseSettings::from_env`](orders_functions::DatabaseSettings::from_env);
//! `LOG_FORMAT` and `RUST_LOG` control logging.

use orders_functions::infrastructure::runtime;
use orders_functions::{GetOrdersFunction, SqlSessionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    runtime::run::<GetOrdersFunction<SqlSessionProvider>>().await
}
