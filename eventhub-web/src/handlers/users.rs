//! Account handlers

use super::types::ErrorResponse;
use crate::{ApiError, AppState, CurrentAccount};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use eventhub_applications::accounts::{
    AccountProfile, LoginRequest, LoginResponse, RegisterRequest, UpdateAccountRequest,
};
use eventhub_core::AccountId;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountProfile),
        (status = 400, description = "Invalid email, password or name", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountProfile>), ApiError> {
    let profile = state.accounts().register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(state.accounts().login(request).await?))
}

/// List public account profiles
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts", body = Vec<AccountProfile>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountProfile>>, ApiError> {
    Ok(Json(state.accounts().list().await?))
}

/// The authenticated caller's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's account", body = AccountProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
) -> Result<Json<AccountProfile>, ApiError> {
    Ok(Json(state.accounts().me(Some(caller)).await?))
}

/// One account's public profile
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account profile", body = AccountProfile),
        (status = 404, description = "No such account", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> Result<Json<AccountProfile>, ApiError> {
    Ok(Json(state.accounts().get(id).await?))
}

/// Update the caller's own account
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountProfile),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Path(id): Path<AccountId>,
    JsonExtractor(request): JsonExtractor<UpdateAccountRequest>,
) -> Result<Json<AccountProfile>, ApiError> {
    Ok(Json(state.accounts().update(Some(caller), id, request).await?))
}

/// Delete the caller's own account and its events
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's account", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Path(id): Path<AccountId>,
) -> Result<StatusCode, ApiError> {
    state.accounts().delete(Some(caller), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
