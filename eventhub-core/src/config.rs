//! Configuration management
//!
//! Configuration is loaded once at startup (TOML file, then environment
//! overrides), validated, and then shared read-only. Missing key material is
//! a fatal error: the server must not come up with authentication disabled.

use crate::error::{ErrorContext, EventHubError, EventHubResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Lifetime of an issued bearer token, in seconds. Fixed, not configurable.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How account secrets are protected at rest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSchemeKind {
    /// Symmetric encryption, recoverable for plaintext comparison at login
    #[default]
    Reversible,
    /// One-way salted Argon2 hash
    Argon2,
}

impl fmt::Display for CredentialSchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSchemeKind::Reversible => write!(f, "reversible"),
            CredentialSchemeKind::Argon2 => write!(f, "argon2"),
        }
    }
}

impl FromStr for CredentialSchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reversible" => Ok(CredentialSchemeKind::Reversible),
            "argon2" => Ok(CredentialSchemeKind::Argon2),
            other => Err(format!("Unknown credential scheme: {}", other)),
        }
    }
}

/// Key material and token settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key for the credential vault
    pub encryption_key: String,
    /// HMAC key for bearer tokens
    pub signing_key: String,
    /// Issuer embedded in and required of every token
    pub issuer: String,
    pub credential_scheme: CredentialSchemeKind,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            encryption_key: String::new(),
            signing_key: String::new(),
            issuer: "eventhub".to_string(),
            credential_scheme: CredentialSchemeKind::default(),
        }
    }
}

// Keys must never reach a log line.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("encryption_key", &redacted(&self.encryption_key))
            .field("signing_key", &redacted(&self.signing_key))
            .field("issuer", &self.issuer)
            .field("credential_scheme", &self.credential_scheme)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl AuthConfig {
    /// Create an auth configuration from explicit key material
    pub fn new(
        encryption_key: impl Into<String>,
        signing_key: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            encryption_key: encryption_key.into(),
            signing_key: signing_key.into(),
            issuer: issuer.into(),
            credential_scheme: CredentialSchemeKind::default(),
        }
    }

    pub fn with_credential_scheme(mut self, scheme: CredentialSchemeKind) -> Self {
        self.credential_scheme = scheme;
        self
    }

    /// Validate key material. Any failure here is fatal at startup.
    pub fn validate(&self) -> EventHubResult<()> {
        if self.encryption_key.trim().is_empty() {
            return Err(missing("auth.encryption_key", "EVENTHUB_ENCRYPTION_KEY"));
        }

        if self.signing_key.trim().is_empty() {
            return Err(missing("auth.signing_key", "EVENTHUB_SIGNING_KEY"));
        }

        if self.issuer.trim().is_empty() {
            return Err(missing("auth.issuer", "EVENTHUB_TOKEN_ISSUER"));
        }

        Ok(())
    }
}

fn missing(field: &str, env_var: &str) -> EventHubError {
    EventHubError::Config {
        message: format!("{} is missing or empty", field),
        source: None,
        context: ErrorContext::new("config")
            .with_operation("validate")
            .with_metadata("field", field)
            .with_suggestion(&format!("Set {} in the config file or {}", field, env_var)),
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> EventHubResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EventHubError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> EventHubResult<Self> {
        toml::from_str(content).map_err(|e| EventHubError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Load and apply environment overrides
    ///
    /// The result is not validated yet: callers validate once logging is
    /// initialised from `self.logging`.
    pub fn load(path: Option<&Path>) -> EventHubResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Apply `EVENTHUB_*` environment variable overrides
    pub fn apply_env(&mut self) -> EventHubResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> EventHubResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("EVENTHUB_ENCRYPTION_KEY") {
            self.auth.encryption_key = key;
        }
        if let Some(key) = lookup("EVENTHUB_SIGNING_KEY") {
            self.auth.signing_key = key;
        }
        if let Some(issuer) = lookup("EVENTHUB_TOKEN_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Some(scheme) = lookup("EVENTHUB_CREDENTIAL_SCHEME") {
            self.auth.credential_scheme = scheme.parse().map_err(|message: String| {
                EventHubError::Config {
                    message,
                    source: None,
                    context: ErrorContext::new("config")
                        .with_operation("apply_env")
                        .with_suggestion("Use 'reversible' or 'argon2'"),
                }
            })?;
        }
        if let Some(host) = lookup("EVENTHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EVENTHUB_PORT") {
            self.server.port = port.parse().map_err(|e| EventHubError::Config {
                message: format!("Invalid EVENTHUB_PORT '{}'", port),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config").with_operation("apply_env"),
            })?;
        }
        if let Some(origins) = lookup("EVENTHUB_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> EventHubResult<()> {
        self.auth.validate()?;

        if self.server.port == 0 {
            return Err(crate::config_error!(
                "server.port must be greater than 0",
                "config"
            ));
        }

        // Credentialed CORS cannot be combined with a wildcard origin.
        if self.server.allowed_origins.iter().any(|o| o.trim() == "*") {
            return Err(crate::config_error!(
                "server.allowed_origins must list explicit origins, not '*'",
                "config"
            ));
        }

        Ok(())
    }
}
