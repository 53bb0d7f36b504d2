//! Event types

use crate::accounts::Account;
use chrono::{DateTime, Utc};
use eventhub_core::{AccountId, EventId};
use serde::{Deserialize, Serialize};

/// Stored event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Event {
    pub id: EventId,
    /// Set once at creation from the caller's verified identity
    pub owner_id: AccountId,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub short_description: String,
    pub long_description: String,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Active and not yet over (or not yet started)
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.is_active && (self.end_date >= now || self.start_date >= now)
    }

    pub fn to_summary(&self, created_by_name: Option<String>) -> EventSummary {
        EventSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            start_date: self.start_date,
            end_date: self.end_date,
            short_description: self.short_description.clone(),
            is_active: self.is_active,
            created_by_name,
        }
    }
}

/// Event data handed to the store for insertion
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: AccountId,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub short_description: String,
    pub long_description: String,
    pub image_path: Option<String>,
    pub is_active: bool,
}

/// Create request. There is deliberately no owner field: the owner is
/// always the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateEventRequest {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub image_path: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Update request; the owner can never be changed
pub type UpdateEventRequest = CreateEventRequest;

fn default_active() -> bool {
    true
}

/// Listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventSummary {
    pub id: EventId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub short_description: String,
    pub is_active: bool,
    pub created_by_name: Option<String>,
}

/// Owner details shown with an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventOwner {
    pub id: AccountId,
    pub name_surname: String,
    pub email: String,
}

impl From<&Account> for EventOwner {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name_surname: account.name_surname.clone(),
            email: account.email.clone(),
        }
    }
}

/// Full event view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventDetail {
    pub id: EventId,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub short_description: String,
    pub long_description: String,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<EventOwner>,
    /// Most recently created upcoming events, public detail only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub latest: Vec<EventSummary>,
}

impl EventDetail {
    pub fn new(event: Event, created_by: Option<EventOwner>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start_date: event.start_date,
            end_date: event.end_date,
            short_description: event.short_description,
            long_description: event.long_description,
            image_path: event.image_path,
            is_active: event.is_active,
            created_at: event.created_at,
            created_by,
            latest: Vec::new(),
        }
    }
}

/// Calendar feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CalendarEntry {
    pub id: EventId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Authenticated listing filters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EventFilter {
    /// Only the caller's events
    #[serde(default)]
    pub mine: bool,
    /// Only events owned by this account; wins over `mine`
    pub created_by: Option<AccountId>,
}
