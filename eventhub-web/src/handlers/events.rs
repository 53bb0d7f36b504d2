//! Event handlers
//!
//! Public reads take no token. The filtered listing takes one optionally.
//! Everything else requires [`CurrentAccount`]; update and delete are
//! additionally refused with 403 unless the caller owns the event.

use super::types::{ErrorResponse, EventsQuery, PublicEventsQuery};
use crate::{ApiError, AppState, CurrentAccount};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use chrono::Utc;
use eventhub_applications::events::{
    CalendarEntry, CreateEventRequest, Event, EventDetail, EventFilter, EventSummary,
    UpdateEventRequest,
};
use eventhub_core::{AccountId, EventId};

/// Active, upcoming events, newest first
#[utoipa::path(
    get,
    path = "/api/events/public",
    tag = "Events",
    params(PublicEventsQuery),
    responses(
        (status = 200, description = "Public listing", body = Vec<EventSummary>)
    )
)]
pub async fn list_public_events(
    State(state): State<AppState>,
    Query(query): Query<PublicEventsQuery>,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    Ok(Json(state.events().list_public(Utc::now(), query.take).await?))
}

/// Public detail of an active event
#[utoipa::path(
    get,
    path = "/api/events/{id}/public",
    tag = "Events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail with latest events", body = EventDetail),
        (status = 404, description = "No such active event", body = ErrorResponse)
    )
)]
pub async fn get_public_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<EventDetail>, ApiError> {
    Ok(Json(state.events().public_detail(id, Utc::now()).await?))
}

/// Calendar feed of upcoming events ordered by start
#[utoipa::path(
    get,
    path = "/api/events/calendar",
    tag = "Events",
    responses(
        (status = 200, description = "Calendar entries", body = Vec<CalendarEntry>)
    )
)]
pub async fn event_calendar(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalendarEntry>>, ApiError> {
    Ok(Json(state.events().calendar(Utc::now()).await?))
}

/// All events ordered by start, optionally filtered by owner
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event listing", body = Vec<EventSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let filter = EventFilter {
        mine: query.mine,
        created_by: query.created_by.map(AccountId),
    };
    Ok(Json(state.events().list(Some(caller), filter).await?))
}

/// The caller's own events
#[utoipa::path(
    get,
    path = "/api/events/mine",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's events", body = Vec<EventSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_my_events(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let filter = EventFilter {
        mine: true,
        created_by: None,
    };
    Ok(Json(state.events().list(Some(caller), filter).await?))
}

/// Full event detail including the owner's profile
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail", body = EventDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    CurrentAccount(_caller): CurrentAccount,
    Path(id): Path<EventId>,
) -> Result<Json<EventDetail>, ApiError> {
    Ok(Json(state.events().get(id).await?))
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input or duplicate title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    JsonExtractor(request): JsonExtractor<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.events().create(Some(caller), request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event the caller owns
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event id")),
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid input or duplicate title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the event", body = ErrorResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Path(id): Path<EventId>,
    JsonExtractor(request): JsonExtractor<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.events().update(Some(caller), id, request).await?))
}

/// Delete an event the caller owns
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the event", body = ErrorResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    Path(id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
    state.events().delete(Some(caller), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
