//! Serve command.

use crate::Result;
use crate::config::ServerConfig;
use crate::services::ForecastService;

/// Runs the HTML UI, with optional host and port overrides.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails.
#[cfg(feature = "http")]
pub async fn cmd_serve(
    service: ForecastService,
    server: &ServerConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut server = server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    crate::web::serve(service, server.socket_addr()?).await
}

/// Runs the HTML UI (feature not enabled).
///
/// # Errors
///
/// Always returns [`crate::Error::FeatureNotEnabled`].
#[cfg(not(feature = "http"))]
#[allow(clippy::unused_async)]
pub async fn cmd_serve(
    _service: ForecastService,
    _server: &ServerConfig,
    _host: Option<String>,
    _port: Option<u16>,
) -> Result<()> {
    Err(crate::Error::FeatureNotEnabled("http".to_string()))
}
