//! Local development server.
//!
//! Serves all four order functions on one port:
//!
//! ```bash
//! cargo run -p orders-functions --bin orders-local
//! curl -X POST localhost:8080/orders -d '{"name":"A","createdAt":"2024-01-01T00:00:00Z"}'
//! curl localhost:8080/orders
//! ```
//!
//! # Environment Variables
//!
//! - `ORDERS_LOCAL_PORT`: listen port (default: 8080)
//! - `DATABASE`: SQLite file (default: ./data/orders.db)
//! - `LOG_FORMAT`: `json` | `text` (default: json)
//! - `RUST_LOG`: filter (default: orders_functions=info)

use std::sync::Arc;

use anyhow::Context as _;
use orders_functions::infrastructure::config::{LocalSettings, TelemetrySettings};
use orders_functions::infrastructure::local::{self, LocalState};
use orders_functions::infrastructure::{runtime, telemetry};
use orders_functions::{DatabaseSettings, OrderFunctions, SessionProvider, SqlSessionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = runtime::load_dotenv();
    telemetry::init(&TelemetrySettings::from_env().context("invalid logging configuration")?);
    runtime::log_dotenv(&dotenv);

    let settings = DatabaseSettings::from_env().context("invalid store configuration")?;
    let local_settings = LocalSettings::from_env().context("invalid local server configuration")?;
    tracing::info!(
        backend = settings.backend.as_str(),
        port = local_settings.port,
        "Starting local orders server"
    );

    let provider = Arc::new(SqlSessionProvider::connect(settings).await?);
    let state = LocalState {
        functions: Arc::new(OrderFunctions::new(Arc::clone(&provider))),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let served = local::serve(state, &local_settings).await;
    provider.shutdown().await;
    served.context("local server failed")
}
