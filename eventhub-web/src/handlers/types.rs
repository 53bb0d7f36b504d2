//! Request and response types owned by the HTTP layer

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "reversible")]
    pub credential_scheme: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Error body returned by every failing endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "unauthorized")]
    pub error: String,
    #[schema(example = "Authentication required")]
    pub message: String,
    /// Offending request field, for validation failures
    pub field: Option<String>,
}

/// Public listing query
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PublicEventsQuery {
    /// Return at most this many events
    pub take: Option<usize>,
}

/// Authenticated listing query
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Only the caller's own events
    #[serde(default)]
    pub mine: bool,
    /// Only events owned by this account
    pub created_by: Option<i64>,
}
