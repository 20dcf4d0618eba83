//! Function Runtime
//!
//! Start-up and event loop shared by the four function binaries. The
//! provider is built once per process and reused across invocations; each
//! invocation runs inside its own span.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use lambda_runtime::{LambdaEvent, service_fn};
use tracing::Instrument;

use super::config::{DatabaseSettings, TelemetrySettings};
use super::functions::OrderFunction;
use super::http::{HttpEvent, HttpResponse};
use super::persistence::SqlSessionProvider;
use super::telemetry;
use crate::application::ports::SessionProvider;

/// Outcome of looking for a `.env` file: the file loaded, if any.
pub type DotenvOutcome = Result<Option<PathBuf>, dotenvy::Error>;

/// Load the nearest `.env` at or above `start`.
///
/// Variables already set in the process environment win over the file.
pub fn load_dotenv_from(start: &Path) -> DotenvOutcome {
    let Some(path) = start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
    else {
        return Ok(None);
    };
    dotenvy::from_path(&path)?;
    Ok(Some(path))
}

/// Load the nearest `.env` at or above the working directory.
///
/// Runs before logging is installed; pass the outcome to [`log_dotenv`]
/// afterwards.
pub fn load_dotenv() -> DotenvOutcome {
    let cwd = std::env::current_dir().map_err(dotenvy::Error::Io)?;
    load_dotenv_from(&cwd)
}

/// Report a [`load_dotenv`] outcome.
pub fn log_dotenv(outcome: &DotenvOutcome) {
    match outcome {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }
}

/// Handle one event inside an invocation span.
pub async fn invoke<P, F>(function: &F, event: LambdaEvent<HttpEvent>) -> HttpResponse
where
    P: SessionProvider,
    F: OrderFunction<P>,
{
    let LambdaEvent { payload, context } = event;
    let span = tracing::info_span!(
        "invocation",
        function = F::NAME,
        request_id = %context.request_id,
    );

    async move {
        let started = Instant::now();
        let method = payload.http_method.clone();
        let response = function.handle(payload).await;
        tracing::info!(
            %method,
            status = response.status_code,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Invocation complete"
        );
        response
    }
    .instrument(span)
    .await
}

/// Serve `function` until the runtime stops.
pub async fn serve<P, F>(function: Arc<F>) -> Result<(), lambda_runtime::Error>
where
    P: SessionProvider + 'static,
    F: OrderFunction<P> + 'static,
{
    lambda_runtime::run(service_fn(move |event: LambdaEvent<HttpEvent>| {
        let function = Arc::clone(&function);
        async move { Ok::<_, lambda_runtime::Error>(invoke::<P, F>(function.as_ref(), event).await) }
    }))
    .await
}

/// Entry point of a function binary.
///
/// Reads configuration, installs logging, and serves `F` over a lazily
/// connected [`SqlSessionProvider`]. The store is first contacted by the
/// first invocation.
pub async fn run<F>() -> anyhow::Result<()>
where
    F: OrderFunction<SqlSessionProvider> + 'static,
{
    let dotenv = load_dotenv();
    telemetry::init(&TelemetrySettings::from_env().context("invalid logging configuration")?);
    log_dotenv(&dotenv);

    let settings = DatabaseSettings::from_env().inspect_err(|e| {
        tracing::error!(function = F::NAME, error = %e, "Invalid store configuration");
    })?;
    tracing::info!(
        function = F::NAME,
        backend = settings.backend.as_str(),
        auto_migrate = settings.connection.auto_migrate,
        "Function starting"
    );

    let provider = Arc::new(SqlSessionProvider::new(settings));
    let function = Arc::new(F::new(Arc::clone(&provider)));

    let result = serve::<SqlSessionProvider, F>(function).await;
    provider.shutdown().await;

    result.map_err(|e| anyhow::anyhow!("function runtime stopped: {e}"))
}
