//! Local Development Server
//!
//! Axum front end that turns plain HTTP requests into [`HttpEvent`]s and
//! routes them to the four functions by method.
//!
//! # Routes
//!
//! - `/orders`: every method, routed like the deployed functions
//! - `/health`: liveness

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde::Serialize;
use serde_json::Value;
use tokio::signal;
use tracing::Instrument;

use super::config::LocalSettings;
use super::functions::OrderFunctions;
use super::http::HttpEvent;
use crate::application::ports::SessionProvider;

/// State shared across handlers.
pub struct LocalState<P: SessionProvider> {
    /// Functions behind `/orders`.
    pub functions: Arc<OrderFunctions<P>>,
    /// Crate version reported by `/health`.
    pub version: String,
}

impl<P: SessionProvider> Clone for LocalState<P> {
    fn clone(&self) -> Self {
        Self {
            functions: Arc::clone(&self.functions),
            version: self.version.clone(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Liveness status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Create the router.
pub fn create_router<P: SessionProvider + 'static>(state: LocalState<P>) -> Router {
    Router::new()
        .route("/health", get(health_check::<P>))
        .route("/orders", any(orders::<P>))
        .with_state(state)
}

async fn health_check<P: SessionProvider + 'static>(
    State(state): State<LocalState<P>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version,
    })
}

async fn orders<P: SessionProvider + 'static>(
    State(state): State<LocalState<P>>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let event = to_event(&method, &headers, query, &body);
    let request_id = uuid::Uuid::new_v4();
    let function = OrderFunctions::<P>::function_for(&event.method()).unwrap_or("none");
    let span = tracing::info_span!("invocation", function, request_id = %request_id);

    let response = state.functions.route(event).instrument(span).await;
    tracing::debug!(%method, status = response.status_code, "Local request complete");

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

/// Convert a plain HTTP request into an invocation event.
#[must_use]
pub fn to_event(
    method: &Method,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: &[u8],
) -> HttpEvent {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(Value::String(String::from_utf8_lossy(body).into_owned()))
    };

    HttpEvent {
        http_method: method.as_str().to_string(),
        headers: (!headers.is_empty()).then_some(headers),
        query_string_parameters: (!query.is_empty()).then_some(query),
        body,
        is_base64_encoded: false,
    }
}

/// Serve `state` on `settings.port` until Ctrl+C or SIGTERM.
pub async fn serve<P: SessionProvider + 'static>(
    state: LocalState<P>,
    settings: &LocalSettings,
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Local server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(await_shutdown())
        .await
}

/// Wait for SIGINT or SIGTERM.
async fn await_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
