//! Account types

use chrono::{DateTime, NaiveDate, Utc};
use eventhub_core::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored account record
///
/// `stored_secret` is the output of the credential scheme and never leaves
/// the service layer; only [`AccountProfile`] is serialisable.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub stored_secret: String,
    pub name_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name_surname", &self.name_surname)
            .field("birth_date", &self.birth_date)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Account {
    /// Convert to public profile
    pub fn to_profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            email: self.email.clone(),
            name_surname: self.name_surname.clone(),
            birth_date: self.birth_date,
            created_at: self.created_at,
        }
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Account data handed to the store for insertion
#[derive(Clone)]
pub struct NewAccount {
    pub email: String,
    pub stored_secret: String,
    pub name_surname: String,
    pub birth_date: Option<NaiveDate>,
}

/// Public account information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountProfile {
    pub id: AccountId,
    pub email: String,
    pub name_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Account registration request
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name_surname: String,
    pub birth_date: Option<NaiveDate>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub account: AccountProfile,
}

/// Self-service account update
///
/// `password` replaces the secret only when `current_password` matches the
/// stored one.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateAccountRequest {
    pub email: String,
    pub name_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}
