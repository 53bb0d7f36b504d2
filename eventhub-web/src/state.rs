//! Application state shared by every handler

use crate::WebResult;
use eventhub_applications::{AccountService, EventHubApplication, EventService};
use eventhub_core::AppConfig;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded and validated configuration
    pub config: Arc<AppConfig>,
    /// Wired services and token issuer
    pub application: Arc<EventHubApplication>,
}

impl AppState {
    /// Build state from configuration. Fails when key material is missing.
    pub fn new(config: AppConfig) -> WebResult<Self> {
        if let Err(e) = config.validate() {
            e.log();
            return Err(e.into());
        }
        let application = EventHubApplication::new(&config.auth)?;
        Ok(Self::with_application(config, application))
    }

    /// Build state around an already wired application
    pub fn with_application(config: AppConfig, application: EventHubApplication) -> Self {
        info!(
            address = %config.server.address(),
            origins = config.server.allowed_origins.len(),
            "Application state initialized"
        );
        Self {
            config: Arc::new(config),
            application: Arc::new(application),
        }
    }

    pub fn accounts(&self) -> &AccountService {
        self.application.accounts()
    }

    pub fn events(&self) -> &EventService {
        self.application.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::AuthConfig;

    #[test]
    fn test_missing_keys_fail_startup() {
        let config = AppConfig::default();
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_state_from_valid_config() {
        let config = AppConfig {
            auth: AuthConfig::new("enc-key", "sig-key", "eventhub"),
            ..AppConfig::default()
        };
        let state = AppState::new(config).unwrap();
        assert_eq!(state.application.tokens().issuer(), "eventhub");
    }

    #[test]
    fn test_wildcard_origin_fails_startup() {
        let mut config = AppConfig {
            auth: AuthConfig::new("enc-key", "sig-key", "eventhub"),
            ..AppConfig::default()
        };
        config.server.allowed_origins = vec!["*".to_string()];
        assert!(AppState::new(config).is_err());
    }
}
