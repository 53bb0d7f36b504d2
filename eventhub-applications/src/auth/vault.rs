//! Credential vault
//!
//! Reversible symmetric protection of account secrets at rest. Every call to
//! [`CredentialVault::encrypt`] draws a fresh random 16-byte IV; the stored
//! form is `base64(IV || ciphertext || tag)` with the IV always first.
//!
//! The cipher is AES-256-GCM with a 128-bit IV, so a corrupted or truncated
//! value, or a value produced under a different key, fails to decrypt
//! instead of yielding garbage.
//!
//! There is no key rotation: values written under one key can only be read
//! back with that same key.

use aes_gcm::{
    aead::{consts::U16, Aead, AeadCore, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// IV length in bytes, always the prefix of the decoded value
pub const IV_LEN: usize = 16;

/// Authentication tag appended by GCM
const TAG_LEN: usize = 16;

type VaultCipher = AesGcm<Aes256, U16>;

/// Vault errors. Messages never include plaintext or key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Encryption key is missing or unusable")]
    InvalidKey,
    #[error("Failed to protect credential")]
    EncryptionFailure,
    #[error("Failed to decrypt credential")]
    DecryptionFailure,
}

/// Symmetric encrypt/decrypt of a secret under a server-held key
#[derive(Clone)]
pub struct CredentialVault {
    cipher: Arc<VaultCipher>,
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}

impl CredentialVault {
    /// Build a vault from the configured key string.
    ///
    /// The AES-256 key is the SHA-256 digest of the configured string, so
    /// any non-empty string is accepted.
    pub fn new(key: &str) -> Result<Self, VaultError> {
        if key.trim().is_empty() {
            return Err(VaultError::InvalidKey);
        }

        let digest = Sha256::digest(key.as_bytes());
        let cipher = VaultCipher::new_from_slice(&digest).map_err(|_| VaultError::InvalidKey)?;

        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    /// Encrypt a secret under a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let iv = VaultCipher::generate_nonce(&mut OsRng);
        let body = self
            .cipher
            .encrypt(&iv, plaintext.as_bytes())
            .map_err(|_| VaultError::EncryptionFailure)?;

        let mut stored = Vec::with_capacity(IV_LEN + body.len());
        stored.extend_from_slice(&iv);
        stored.extend_from_slice(&body);

        Ok(BASE64.encode(stored))
    }

    /// Recover a secret previously produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, stored: &str) -> Result<String, VaultError> {
        let raw = BASE64
            .decode(stored.trim())
            .map_err(|_| VaultError::DecryptionFailure)?;

        if raw.len() < IV_LEN + TAG_LEN {
            return Err(VaultError::DecryptionFailure);
        }

        let (iv, body) = raw.split_at(IV_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::<U16>::from_slice(iv), body)
            .map_err(|_| VaultError::DecryptionFailure)?;

        String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> CredentialVault {
        CredentialVault::new("test-encryption-key").unwrap()
    }

    #[test]
    fn test_round_trip() {
        let vault = vault();
        let long = "x".repeat(1024);
        for secret in ["Abcdef12", "", "p@ss wörd ✓", long.as_str()] {
            let stored = vault.encrypt(secret).unwrap();
            assert_eq!(vault.decrypt(&stored).unwrap(), secret);
        }
    }

    #[test]
    fn test_stored_form_layout() {
        let vault = vault();
        let stored = vault.encrypt("Abcdef12").unwrap();
        assert_ne!(stored, "Abcdef12");

        let raw = BASE64.decode(&stored).unwrap();
        assert_eq!(raw.len(), IV_LEN + "Abcdef12".len() + TAG_LEN);
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let vault = vault();
        let first = vault.encrypt("Abcdef12").unwrap();
        let second = vault.encrypt("Abcdef12").unwrap();
        assert_ne!(first, second);

        let first_iv = &BASE64.decode(&first).unwrap()[..IV_LEN];
        let second_iv = &BASE64.decode(&second).unwrap()[..IV_LEN];
        assert_ne!(first_iv, second_iv);
    }

    #[test]
    fn test_any_flipped_byte_is_rejected() {
        let vault = vault();
        let raw = BASE64.decode(vault.encrypt("Abcdef12").unwrap()).unwrap();

        for index in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[index] ^= 0x01;
            assert_eq!(
                vault.decrypt(&BASE64.encode(&tampered)),
                Err(VaultError::DecryptionFailure),
                "byte {} was not detected",
                index
            );
        }
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let stored = vault().encrypt("Abcdef12").unwrap();
        let other = CredentialVault::new("another-key").unwrap();
        assert_eq!(other.decrypt(&stored), Err(VaultError::DecryptionFailure));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let vault = vault();
        assert_eq!(vault.decrypt(""), Err(VaultError::DecryptionFailure));
        assert_eq!(vault.decrypt("not base64!!"), Err(VaultError::DecryptionFailure));

        let raw = BASE64.decode(vault.encrypt("Abcdef12").unwrap()).unwrap();
        let truncated = BASE64.encode(&raw[..IV_LEN + 4]);
        assert_eq!(vault.decrypt(&truncated), Err(VaultError::DecryptionFailure));
    }

    #[test]
    fn test_empty_key_is_refused() {
        assert_eq!(CredentialVault::new("").unwrap_err(), VaultError::InvalidKey);
        assert_eq!(CredentialVault::new("   ").unwrap_err(), VaultError::InvalidKey);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let rendered = format!("{:?}", vault());
        assert!(!rendered.contains("test-encryption-key"));
    }
}
