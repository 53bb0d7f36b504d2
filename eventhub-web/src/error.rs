//! Mapping of application errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use eventhub_applications::{AccessError, AccountError, EventError};
use serde_json::json;
use tracing::error;

/// Error returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Status and code for a refused access check
fn classify_access(error: &AccessError) -> (StatusCode, &'static str) {
    match error {
        AccessError::IdentityAbsent => (StatusCode::UNAUTHORIZED, "unauthorized"),
        AccessError::OwnershipDenied => (StatusCode::FORBIDDEN, "forbidden"),
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<&'static str>) {
        match self {
            ApiError::Access(e) => {
                let (status, code) = classify_access(e);
                (status, code, None)
            }
            ApiError::Account(e) => match e {
                AccountError::Validation { field, .. } => {
                    (StatusCode::BAD_REQUEST, "validation_error", Some(*field))
                }
                AccountError::EmailTaken => (StatusCode::CONFLICT, "email_taken", Some("email")),
                AccountError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
                }
                AccountError::CurrentPasswordRequired | AccountError::CurrentPasswordMismatch => (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    Some("current_password"),
                ),
                AccountError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
                AccountError::Access(e) => {
                    let (status, code) = classify_access(e);
                    (status, code, None)
                }
                AccountError::Credential(_) | AccountError::Token(_) | AccountError::Store(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
            },
            ApiError::Event(e) => match e {
                EventError::Validation { field, .. } => {
                    (StatusCode::BAD_REQUEST, "validation_error", Some(*field))
                }
                EventError::TitleTaken => (StatusCode::BAD_REQUEST, "title_taken", Some("title")),
                EventError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
                EventError::Access(e) => {
                    let (status, code) = classify_access(e);
                    (status, code, None)
                }
                EventError::Store(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, field) = self.parts();

        let message = match status {
            StatusCode::UNAUTHORIZED if code == "unauthorized" => {
                "Authentication required".to_string()
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let mut body = json!({
            "error": code,
            "message": message,
        });
        if let Some(field) = field {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_applications::StoreError;
    use eventhub_core::{AccountId, EventId};

    fn status(error: impl Into<ApiError>) -> StatusCode {
        error.into().into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(AccessError::IdentityAbsent), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AccessError::OwnershipDenied), StatusCode::FORBIDDEN);
        assert_eq!(status(AccountError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AccountError::EmailTaken), StatusCode::CONFLICT);
        assert_eq!(status(AccountError::NotFound(AccountId(1))), StatusCode::NOT_FOUND);
        assert_eq!(status(EventError::NotFound(EventId(1))), StatusCode::NOT_FOUND);
        assert_eq!(status(EventError::TitleTaken), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(EventError::Access(AccessError::OwnershipDenied)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(EventError::Store(StoreError::Backend {
                message: "down".to_string()
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
