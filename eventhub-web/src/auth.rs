//! Bearer token extractors
//!
//! `CurrentAccount` rejects the request with 401 on any failure: missing
//! header, wrong scheme, bad signature, expiry, foreign issuer or a token
//! without an account id. The response body is the same in every case.

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use eventhub_core::AccountId;
use serde_json::json;
use tracing::debug;

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAccount(pub AccountId);

/// 401 rejection with a generic body
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "message": "Authentication required",
            })),
        )
            .into_response()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

fn resolve(parts: &Parts, state: &AppState) -> Option<AccountId> {
    let token = match bearer_token(&parts.headers) {
        Some(token) => token,
        None => {
            debug!("No bearer token on request");
            return None;
        }
    };

    state.application.authenticate(token).ok()
}

impl<S> FromRequestParts<S> for CurrentAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve(parts, &state).map(CurrentAccount).ok_or(Unauthorized)
    }
}
