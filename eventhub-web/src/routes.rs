//! Route definitions for the EventHub web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health and documentation
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        // Accounts
        .route("/users", post(handlers::register).get(handlers::list_users))
        .route("/users/login", post(handlers::login))
        .route("/users/me", get(handlers::current_user))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Events
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/events/public", get(handlers::list_public_events))
        .route("/events/calendar", get(handlers::event_calendar))
        .route("/events/mine", get(handlers::list_my_events))
        .route(
            "/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route("/events/{id}/public", get(handlers::get_public_event))
}
