//! Credential scheme selection
//!
//! `Reversible` keeps the vault behaviour: the stored secret is decrypted
//! and compared with the supplied one at login. `Argon2` stores a one-way
//! salted hash instead and gives up recoverability.

use super::vault::{CredentialVault, VaultError};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use eventhub_core::{AuthConfig, CredentialSchemeKind};
use tracing::warn;

/// Active protection scheme for account secrets
#[derive(Debug, Clone)]
pub enum CredentialScheme {
    Reversible(CredentialVault),
    Argon2,
}

impl CredentialScheme {
    /// Build the scheme named by the configuration
    pub fn from_config(config: &AuthConfig) -> Result<Self, VaultError> {
        match config.credential_scheme {
            CredentialSchemeKind::Reversible => {
                Ok(Self::Reversible(CredentialVault::new(&config.encryption_key)?))
            }
            CredentialSchemeKind::Argon2 => Ok(Self::Argon2),
        }
    }

    pub fn kind(&self) -> CredentialSchemeKind {
        match self {
            Self::Reversible(_) => CredentialSchemeKind::Reversible,
            Self::Argon2 => CredentialSchemeKind::Argon2,
        }
    }

    /// Produce the stored form of a secret
    pub fn protect(&self, secret: &str) -> Result<String, VaultError> {
        match self {
            Self::Reversible(vault) => vault.encrypt(secret),
            Self::Argon2 => hash_password(secret),
        }
    }

    /// Check a freshly supplied secret against its stored form
    ///
    /// An undecryptable or unparsable stored value counts as a mismatch.
    pub fn verify(&self, supplied: &str, stored: &str) -> bool {
        match self {
            Self::Reversible(vault) => match vault.decrypt(stored) {
                Ok(recovered) => recovered == supplied,
                Err(e) => {
                    warn!(error = %e, "Stored credential could not be recovered");
                    false
                }
            },
            Self::Argon2 => verify_password(supplied, stored),
        }
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| VaultError::EncryptionFailure)
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        warn!("Stored credential is not a valid password hash");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
