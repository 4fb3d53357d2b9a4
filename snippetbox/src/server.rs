//! HTTP server with graceful shutdown

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::{config::Config, error::Result};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server with the given router
    ///
    /// Returns once a shutdown signal arrived and in-flight requests drained.
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = self.config.bind_address();

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = app
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(RequestBodyLimitLayer::new(
                self.config.middleware.body_limit_bytes(),
            ));

        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", listener.local_addr()?);

        // log_request reads the peer address from ConnectInfo
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn log_middleware_config(&self) {
        let config = &self.config;
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Request body limit: {} KB", config.middleware.body_limit_kb);
        tracing::info!("  - Request timeout: {} seconds", config.service.timeout_secs);
        tracing::info!(
            "  - Security headers: {}",
            if config.security_headers.enabled { "enabled" } else { "disabled" }
        );
        tracing::info!(
            "  - CSRF protection: {}",
            if config.session.csrf.enabled { "enabled" } else { "disabled" }
        );
        tracing::info!(
            "  - Session cookie: {} (secure: {}, expiry: {}s)",
            config.session.cookie_name,
            config.session.secure,
            config.session.expiry_secs
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, 4000);
        assert_eq!(server.config().bind_address(), "0.0.0.0:4000");
    }
}
