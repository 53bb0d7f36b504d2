//! Bearer token issuance and validation
//!
//! Tokens are HS256-signed JWTs carrying the account id (as `userId` and as
//! the standard `sub`), a fresh `jti`, the configured issuer and an absolute
//! expiry one hour after issuance. Validation is stateless: a token stays
//! valid until it expires, there is no revocation list.

use chrono::{DateTime, Duration, TimeZone, Utc};
use eventhub_core::{AccountId, AuthConfig, TOKEN_LIFETIME_SECS};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Token errors
///
/// Everything except `MissingKey` and `Creation` means "unauthenticated" to
/// the caller; the variants exist so logs can tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing key is missing or empty")]
    MissingKey,
    #[error("Token creation failed")]
    Creation,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token issuer is not accepted")]
    InvalidIssuer,
    #[error("Token claims are malformed")]
    Malformed,
}

/// Claims written into every issued token
#[derive(Debug, Serialize)]
struct TokenClaims {
    sub: String,
    #[serde(rename = "userId")]
    user_id: String,
    jti: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Verified claim set, valid for the lifetime of one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Look up a claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Token-unique identifier (`jti`)
    pub fn token_id(&self) -> Option<Uuid> {
        self.get("jti")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.get("exp")
            .and_then(Value::as_i64)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// A freshly minted token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds until expiry as of issuance
    pub fn expires_in(&self) -> i64 {
        TOKEN_LIFETIME_SECS
    }
}

/// Mints and validates signed, time-boxed bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer; an empty signing key or issuer is refused
    pub fn new(signing_key: &str, issuer: &str) -> Result<Self, TokenError> {
        if signing_key.trim().is_empty() || issuer.trim().is_empty() {
            return Err(TokenError::MissingKey);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
            issuer: issuer.to_string(),
            lifetime: Duration::seconds(TOKEN_LIFETIME_SECS),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        Self::new(&config.signing_key, &config.issuer)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for an authenticated account
    pub fn issue(&self, account_id: AccountId) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as of `issued_at`
    pub fn issue_at(
        &self,
        account_id: AccountId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let token_id = Uuid::new_v4();
        // `exp` has whole-second resolution; round up so the token never
        // expires before issuance plus the full lifetime.
        let exact_expiry = issued_at + self.lifetime;
        let exp = exact_expiry.timestamp() + i64::from(exact_expiry.timestamp_subsec_nanos() > 0);
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(TokenError::Creation)?;

        let claims = TokenClaims {
            sub: account_id.to_string(),
            user_id: account_id.to_string(),
            jti: token_id.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            warn!("Failed to encode token: {}", e);
            TokenError::Creation
        })?;

        debug!(account_id = %account_id, token_id = %token_id, "Issued token");
        Ok(IssuedToken {
            token,
            token_id,
            expires_at,
        })
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`: signature and issuer first, then expiry
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, TokenError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                    ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    // Any structural damage means integrity cannot be established.
                    _ => TokenError::InvalidSignature,
                };
                debug!(reason = %error, "Token rejected");
                error
            })?;

        let claims = ClaimSet::new(data.claims);
        let expires_at = claims.expires_at().ok_or_else(|| {
            debug!(reason = %TokenError::Malformed, "Token rejected");
            TokenError::Malformed
        })?;

        if now > expires_at {
            debug!(reason = %TokenError::Expired, "Token rejected");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
