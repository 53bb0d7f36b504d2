//! Account service
//!
//! Registration, login and self-service profile management. Secrets go
//! through the configured [`CredentialScheme`]; tokens through the
//! [`TokenIssuer`]; every change to an account through the
//! [`OwnershipGuard`].

use super::types::{
    Account, AccountProfile, LoginRequest, LoginResponse, NewAccount, RegisterRequest,
    UpdateAccountRequest,
};
use super::validation::{self, FieldError};
use crate::auth::{AccessError, CredentialScheme, OwnershipGuard, TokenError, TokenIssuer, VaultError};
use crate::store::{AccountStore, EventStore, StoreError};
use eventhub_core::AccountId;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Account operation errors
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email and wrong password are reported identically
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is required to change the password")]
    CurrentPasswordRequired,

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Credential protection failed: {0}")]
    Credential(#[from] VaultError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<FieldError> for AccountError {
    fn from(error: FieldError) -> Self {
        Self::Validation {
            field: error.field,
            message: error.message,
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateEmail { .. } => Self::EmailTaken,
            other => Self::Store(other),
        }
    }
}

pub type AccountResult<T> = Result<T, AccountError>;

/// Account service
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    events: Arc<dyn EventStore>,
    credentials: CredentialScheme,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        events: Arc<dyn EventStore>,
        credentials: CredentialScheme,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            accounts,
            events,
            credentials,
            tokens,
        }
    }

    /// Register a new account
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<AccountProfile> {
        let email = request.email.trim().to_string();
        validation::validate_email(&email)?;
        validation::validate_password(&request.password)?;
        validation::validate_name(&request.name_surname)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            debug!("Registration refused, email already in use");
            return Err(AccountError::EmailTaken);
        }

        let stored_secret = self.credentials.protect(&request.password)?;
        let account = self
            .accounts
            .insert_account(NewAccount {
                email,
                stored_secret,
                name_surname: request.name_surname.trim().to_string(),
                birth_date: request.birth_date,
            })
            .await?;

        info!(account_id = %account.id, "Account registered");
        Ok(account.to_profile())
    }

    /// Check credentials and issue a bearer token
    pub async fn login(&self, request: LoginRequest) -> AccountResult<LoginResponse> {
        let account = match self.accounts.find_by_email(&request.email).await? {
            Some(account) => account,
            None => {
                debug!("Login failed: unknown email");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !self
            .credentials
            .verify(&request.password, &account.stored_secret)
        {
            debug!(account_id = %account.id, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self.tokens.issue(account.id)?;
        info!(account_id = %account.id, token_id = %issued.token_id, "Login succeeded");

        Ok(LoginResponse {
            expires_in: issued.expires_in(),
            expires_at: issued.expires_at,
            token: issued.token,
            token_type: "Bearer".to_string(),
            account: account.to_profile(),
        })
    }

    pub async fn get(&self, id: AccountId) -> AccountResult<AccountProfile> {
        Ok(self.load(id).await?.to_profile())
    }

    /// The caller's own profile
    pub async fn me(&self, caller: Option<AccountId>) -> AccountResult<AccountProfile> {
        let caller = OwnershipGuard::require_identity(caller)?;
        self.get(caller).await
    }

    pub async fn list(&self) -> AccountResult<Vec<AccountProfile>> {
        let accounts = self.accounts.list_accounts().await?;
        Ok(accounts.iter().map(Account::to_profile).collect())
    }

    /// Update the caller's own account
    pub async fn update(
        &self,
        caller: Option<AccountId>,
        target: AccountId,
        request: UpdateAccountRequest,
    ) -> AccountResult<AccountProfile> {
        // The target is known up front, so the guard runs before any lookup.
        OwnershipGuard::require_self(caller, target)?;
        let mut account = self.load(target).await?;

        let email = request.email.trim().to_string();
        validation::validate_email(&email)?;
        validation::validate_name(&request.name_surname)?;

        if !account.has_email(&email) {
            if let Some(existing) = self.accounts.find_by_email(&email).await? {
                if existing.id != account.id {
                    return Err(AccountError::EmailTaken);
                }
            }
        }

        if let Some(new_password) = request.password.as_deref().filter(|p| !p.is_empty()) {
            let current = request
                .current_password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or(AccountError::CurrentPasswordRequired)?;

            if !self.credentials.verify(current, &account.stored_secret) {
                warn!(account_id = %account.id, "Password change refused: current password mismatch");
                return Err(AccountError::CurrentPasswordMismatch);
            }

            validation::validate_password(new_password)?;
            account.stored_secret = self.credentials.protect(new_password)?;
        }

        account.email = email;
        account.name_surname = request.name_surname.trim().to_string();
        account.birth_date = request.birth_date;

        self.accounts.update_account(&account).await?;
        info!(account_id = %account.id, "Account updated");
        Ok(account.to_profile())
    }

    /// Delete the caller's own account together with the events it owns
    pub async fn delete(&self, caller: Option<AccountId>, target: AccountId) -> AccountResult<()> {
        OwnershipGuard::require_self(caller, target)?;
        let account = self.load(target).await?;

        let removed = self.events.delete_events_by_owner(account.id).await?;
        self.accounts.delete_account(account.id).await?;

        info!(account_id = %account.id, events_removed = removed, "Account deleted");
        Ok(())
    }

    async fn load(&self, id: AccountId) -> AccountResult<Account> {
        self.accounts
            .get_account(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{current_account_id, CredentialVault};
    use crate::store::MemoryStore;

    fn service() -> AccountService {
        let store = Arc::new(MemoryStore::new());
        let vault = CredentialVault::new("test-encryption-key").unwrap();
        AccountService::new(
            store.clone(),
            store,
            CredentialScheme::Reversible(vault),
            TokenIssuer::new("test-signing-key", "eventhub-test").unwrap(),
        )
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            name_surname: "Alice Smith".to_string(),
            birth_date: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn update(email: &str) -> UpdateAccountRequest {
        UpdateAccountRequest {
            email: email.to_string(),
            name_surname: "Alice Jones".to_string(),
            birth_date: None,
            password: None,
            current_password: None,
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = service();
        let profile = service.register(registration("alice@example.com")).await.unwrap();

        let response = service
            .login(login("alice@example.com", "Passw0rd!"))
            .await
            .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.account, profile);

        let claims = service.tokens.validate(&response.token).unwrap();
        assert_eq!(current_account_id(&claims), Some(profile.id));
    }

    #[tokio::test]
    async fn test_secret_is_not_stored_in_clear() {
        let service = service();
        let profile = service.register(registration("alice@example.com")).await.unwrap();
        let stored = service.accounts.get_account(profile.id).await.unwrap().unwrap();
        assert_ne!(stored.stored_secret, "Passw0rd!");
        assert!(!stored.stored_secret.contains("Passw0rd!"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.register(registration("alice@example.com")).await.unwrap();

        let wrong_password = service
            .login(login("alice@example.com", "WrongPass1"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login("bob@example.com", "Passw0rd!"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = service();

        assert!(matches!(
            service.register(registration("not-an-email")).await,
            Err(AccountError::Validation { field: "email", .. })
        ));

        let mut weak = registration("alice@example.com");
        weak.password = "password".to_string();
        assert!(matches!(
            service.register(weak).await,
            Err(AccountError::Validation { field: "password", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_ignores_case() {
        let service = service();
        service.register(registration("alice@example.com")).await.unwrap();
        assert!(matches!(
            service.register(registration("Alice@Example.com")).await,
            Err(AccountError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_update_is_self_service_only() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();
        let bob = service.register(registration("bob@example.com")).await.unwrap();

        let result = service
            .update(Some(bob.id), alice.id, update("alice@example.com"))
            .await;
        assert!(matches!(
            result,
            Err(AccountError::Access(AccessError::OwnershipDenied))
        ));

        let result = service.update(None, alice.id, update("alice@example.com")).await;
        assert!(matches!(
            result,
            Err(AccountError::Access(AccessError::IdentityAbsent))
        ));

        let updated = service
            .update(Some(alice.id), alice.id, update("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name_surname, "Alice Jones");
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();
        service.register(registration("bob@example.com")).await.unwrap();

        let result = service
            .update(Some(alice.id), alice.id, update("BOB@example.com"))
            .await;
        assert!(matches!(result, Err(AccountError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_password_change_requires_current_password() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();

        let mut request = update("alice@example.com");
        request.password = Some("NewPassw0rd".to_string());
        assert!(matches!(
            service.update(Some(alice.id), alice.id, request.clone()).await,
            Err(AccountError::CurrentPasswordRequired)
        ));

        request.current_password = Some("WrongPass1".to_string());
        assert!(matches!(
            service.update(Some(alice.id), alice.id, request.clone()).await,
            Err(AccountError::CurrentPasswordMismatch)
        ));

        request.current_password = Some("Passw0rd!".to_string());
        service.update(Some(alice.id), alice.id, request).await.unwrap();

        assert!(service.login(login("alice@example.com", "Passw0rd!")).await.is_err());
        assert!(service.login(login("alice@example.com", "NewPassw0rd")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_is_self_service_only() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();
        let bob = service.register(registration("bob@example.com")).await.unwrap();

        assert!(matches!(
            service.delete(Some(bob.id), alice.id).await,
            Err(AccountError::Access(AccessError::OwnershipDenied))
        ));
        service.delete(Some(alice.id), alice.id).await.unwrap();
        assert!(matches!(
            service.get(alice.id).await,
            Err(AccountError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_foreign_target_is_denied_whether_or_not_it_exists() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();
        let bob = service.register(registration("bob@example.com")).await.unwrap();
        let missing = AccountId(999);

        for target in [alice.id, missing] {
            assert!(matches!(
                service.update(Some(bob.id), target, update("bob@example.com")).await,
                Err(AccountError::Access(AccessError::OwnershipDenied))
            ));
            assert!(matches!(
                service.delete(Some(bob.id), target).await,
                Err(AccountError::Access(AccessError::OwnershipDenied))
            ));
        }
    }

    #[tokio::test]
    async fn test_me_requires_identity() {
        let service = service();
        let alice = service.register(registration("alice@example.com")).await.unwrap();
        assert_eq!(service.me(Some(alice.id)).await.unwrap(), alice);
        assert!(matches!(
            service.me(None).await,
            Err(AccountError::Access(AccessError::IdentityAbsent))
        ));
    }
}
