//! EventHub Web Server
//!
//! Binds the listener and serves the router.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use eventhub_core::{AppConfig, LoggingConfig};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main EventHub server
pub struct EventHubServer {
    state: AppState,
}

impl EventHubServer {
    /// Create a server; fails when the configuration is not usable
    pub fn new(config: AppConfig) -> WebResult<Self> {
        let state = AppState::new(config)?;
        Ok(Self { state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.state.config.server.address();

        info!("Starting EventHub web server");
        info!(
            "Credential scheme: {}",
            self.state.config.auth.credential_scheme
        );

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for EventHubServer
pub struct EventHubServerBuilder {
    config: AppConfig,
}

impl EventHubServerBuilder {
    /// Start from an already loaded configuration
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Replace the logging configuration
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<EventHubServer> {
        EventHubServer::new(self.config)
    }
}
