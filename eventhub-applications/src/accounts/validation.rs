//! Registration and profile input checks

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// A rejected field and the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if EMAIL_PATTERN.is_match(email.trim()) {
        Ok(())
    } else {
        Err(FieldError::new("email", "Email address is not valid"))
    }
}

/// At least eight characters with a lowercase letter, an uppercase letter
/// and a digit
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lower && has_upper && has_digit {
        Ok(())
    } else {
        Err(FieldError::new(
            "password",
            "Password must contain a lowercase letter, an uppercase letter and a digit",
        ))
    }
}

pub fn validate_name(name_surname: &str) -> Result<(), FieldError> {
    if name_surname.trim().is_empty() {
        Err(FieldError::new("name_surname", "Name is required"))
    } else {
        Ok(())
    }
}
