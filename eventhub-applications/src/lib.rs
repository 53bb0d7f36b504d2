//! EventHub Applications - identity, access control and domain services
//!
//! Everything between the HTTP layer and storage:
//!
//! - **auth**: credential protection, bearer tokens, caller identity and the
//!   ownership guard
//! - **accounts**: registration, login and self-service account management
//! - **events**: public event listings and owner-only event management
//! - **store**: persistence traits and the in-memory backend

pub mod accounts;
pub mod auth;
pub mod events;
pub mod store;

pub use accounts::{AccountError, AccountService};
pub use auth::{
    current_account_id, AccessError, ClaimSet, CredentialScheme, CredentialVault, OwnershipGuard,
    TokenError, TokenIssuer, VaultError, Verdict,
};
pub use events::{EventError, EventService};
pub use store::{AccountStore, EventStore, MemoryStore, StoreError};

use eventhub_core::{AccountId, AuthConfig, EventHubError};
use std::sync::Arc;
use tracing::{debug, info};

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Core error: {0}")]
    Core(#[from] EventHubError),

    #[error("Credential vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// The wired-up services sharing one store, one credential scheme and one
/// token issuer
#[derive(Clone)]
pub struct EventHubApplication {
    accounts: AccountService,
    events: EventService,
    tokens: TokenIssuer,
}

impl EventHubApplication {
    /// Build the application over the in-memory store
    pub fn new(config: &AuthConfig) -> ApplicationResult<Self> {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(config, store.clone(), store)
    }

    /// Build the application over the given stores
    ///
    /// Missing keys are refused here so a misconfigured process never serves
    /// a request.
    pub fn with_stores(
        config: &AuthConfig,
        accounts: Arc<dyn AccountStore>,
        events: Arc<dyn EventStore>,
    ) -> ApplicationResult<Self> {
        config.validate()?;

        let credentials = CredentialScheme::from_config(config)?;
        let tokens = TokenIssuer::from_config(config)?;
        info!(
            scheme = %credentials.kind(),
            issuer = %tokens.issuer(),
            "Identity services ready"
        );

        Ok(Self {
            accounts: AccountService::new(
                accounts.clone(),
                events.clone(),
                credentials,
                tokens.clone(),
            ),
            events: EventService::new(events, accounts),
            tokens,
        })
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn events(&self) -> &EventService {
        &self.events
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Resolve a raw bearer token to the calling account
    ///
    /// Every failure (bad signature, expiry, wrong issuer, missing id claim)
    /// collapses into [`AccessError::IdentityAbsent`]; the reason is logged.
    pub fn authenticate(&self, token: &str) -> Result<AccountId, AccessError> {
        let claims = self.tokens.validate(token).map_err(|e| {
            debug!(reason = %e, "Bearer token refused");
            AccessError::IdentityAbsent
        })?;

        current_account_id(&claims).ok_or_else(|| {
            debug!("Bearer token carries no account id");
            AccessError::IdentityAbsent
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::CredentialSchemeKind;

    fn config() -> AuthConfig {
        AuthConfig::new("test-encryption-key", "test-signing-key", "eventhub-test")
    }

    #[test]
    fn test_missing_keys_are_fatal() {
        let missing_signing = AuthConfig::new("enc", "", "eventhub");
        assert!(matches!(
            EventHubApplication::new(&missing_signing),
            Err(ApplicationError::Core(_))
        ));

        let missing_encryption = AuthConfig::new("", "sig", "eventhub");
        assert!(EventHubApplication::new(&missing_encryption).is_err());
    }

    #[test]
    fn test_authenticate() {
        let app = EventHubApplication::new(&config()).unwrap();
        let issued = app.tokens().issue(AccountId(5)).unwrap();

        assert_eq!(app.authenticate(&issued.token), Ok(AccountId(5)));
        assert_eq!(
            app.authenticate("garbage"),
            Err(AccessError::IdentityAbsent)
        );
    }

    #[test]
    fn test_other_deployment_tokens_are_refused() {
        let app = EventHubApplication::new(&config()).unwrap();
        let other = EventHubApplication::new(&AuthConfig::new(
            "test-encryption-key",
            "another-signing-key",
            "eventhub-test",
        ))
        .unwrap();

        let issued = other.tokens().issue(AccountId(5)).unwrap();
        assert_eq!(
            app.authenticate(&issued.token),
            Err(AccessError::IdentityAbsent)
        );
    }

    #[tokio::test]
    async fn test_argon2_scheme_round_trip() {
        let config = config().with_credential_scheme(CredentialSchemeKind::Argon2);
        let app = EventHubApplication::new(&config).unwrap();

        app.accounts()
            .register(accounts::RegisterRequest {
                email: "alice@example.com".to_string(),
                password: "Passw0rd!".to_string(),
                name_surname: "Alice".to_string(),
                birth_date: None,
            })
            .await
            .unwrap();

        let response = app
            .accounts()
            .login(accounts::LoginRequest {
                email: "alice@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();
        assert!(app.authenticate(&response.token).is_ok());
    }
}
