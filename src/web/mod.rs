//! Server-rendered HTML front end (`http` feature).
//!
//! The router holds only a [`ForecastService`]; every request goes through
//! the service and so gets its own short-lived storage session.

mod handlers;

use axum::Router;
use axum::http::header;
use axum::routing::{get, post};
use std::net::SocketAddr;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::services::ForecastService;
use crate::{Error, Result};

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'none'; style-src 'unsafe-inline'; form-action 'self'; frame-ancestors 'none'";

/// Builds the application router.
pub fn router(service: ForecastService) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/forecasts",
            get(handlers::list_forecasts).post(handlers::create_forecast),
        )
        .route("/forecasts/new", get(handlers::new_forecast_form))
        .route(
            "/forecasts/{id}",
            get(handlers::show_forecast).post(handlers::update_forecast),
        )
        .route("/forecasts/{id}/edit", get(handlers::edit_forecast_form))
        .route("/forecasts/{id}/delete", post(handlers::delete_forecast))
        // Security headers (OWASP recommendations)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            header::HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves the UI until the process is stopped.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the address cannot be bound or the
/// server stops with an I/O error.
pub async fn serve(service: ForecastService, addr: SocketAddr) -> Result<()> {
    // Metrics are optional for the UI; a second recorder is not fatal.
    if let Err(e) = crate::observability::install_prometheus() {
        tracing::warn!(error = %e, "Prometheus recorder not installed");
    }

    let app = router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{addr}: {e}"),
        })?;

    tracing::info!(%addr, "Serving forecasts UI");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
