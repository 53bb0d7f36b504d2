//! OpenAPI document for the EventHub API

use axum::response::Json;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{ErrorResponse, HealthResponse};
use eventhub_applications::accounts::{
    AccountProfile, LoginRequest, LoginResponse, RegisterRequest, UpdateAccountRequest,
};
use eventhub_applications::events::{
    CalendarEntry, CreateEventRequest, Event, EventDetail, EventOwner, EventSummary,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventHub API",
        version = "0.1.0",
        description = "Accounts, bearer-token authentication and owner-only event management"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::list_users,
        crate::handlers::current_user,
        crate::handlers::get_user,
        crate::handlers::update_user,
        crate::handlers::delete_user,

        crate::handlers::list_public_events,
        crate::handlers::get_public_event,
        crate::handlers::event_calendar,
        crate::handlers::list_events,
        crate::handlers::list_my_events,
        crate::handlers::get_event,
        crate::handlers::create_event,
        crate::handlers::update_event,
        crate::handlers::delete_event,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            AccountProfile,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateAccountRequest,
            Event,
            EventSummary,
            EventDetail,
            EventOwner,
            CalendarEntry,
            CreateEventRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Registration, login and self-service account management"),
        (name = "Events", description = "Public listings and owner-only event management"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Serve the document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// The document as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}
