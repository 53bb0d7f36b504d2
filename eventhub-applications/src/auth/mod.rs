//! Identity and Access Control
//!
//! The pieces every request passes through before it may touch an account or
//! an event:
//! - `vault`: reversible protection of account secrets at rest
//! - `credentials`: the configured credential scheme (vault or Argon2)
//! - `token`: bearer token issuance and validation
//! - `identity`: caller identity extraction from verified claims
//! - `ownership`: the single ownership rule applied before every mutation

pub mod credentials;
pub mod identity;
pub mod ownership;
pub mod token;
pub mod vault;

pub use credentials::CredentialScheme;
pub use identity::{current_account_id, ACCOUNT_ID_CLAIMS};
pub use ownership::{AccessError, OwnershipGuard, Verdict};
pub use token::{ClaimSet, IssuedToken, TokenError, TokenIssuer};
pub use vault::{CredentialVault, VaultError, IV_LEN};
