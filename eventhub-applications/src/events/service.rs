//! Event service
//!
//! Public listings are open to anyone. Creating an event requires an
//! identity, and the owner is always that identity. Updates and deletes
//! load the event once, pass its owner to the [`OwnershipGuard`] and only
//! then touch the store.

use super::types::{
    CalendarEntry, CreateEventRequest, Event, EventDetail, EventFilter, EventOwner, EventSummary,
    NewEvent, UpdateEventRequest,
};
use crate::auth::{AccessError, OwnershipGuard};
use crate::store::{AccountStore, EventStore, StoreError};
use chrono::{DateTime, Utc};
use eventhub_core::{AccountId, EventId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// How many recent events accompany a public detail view
pub const LATEST_EVENTS: usize = 5;

/// Event operation errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("An event with this title already exists")]
    TitleTaken,

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EventError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateTitle { .. } => Self::TitleTaken,
            other => Self::Store(other),
        }
    }
}

impl EventError {
    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type EventResult<T> = Result<T, EventError>;

/// Event service
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
    accounts: Arc<dyn AccountStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { events, accounts }
    }

    /// Active events that have not finished, newest first
    pub async fn list_public(
        &self,
        now: DateTime<Utc>,
        take: Option<usize>,
    ) -> EventResult<Vec<EventSummary>> {
        let mut events: Vec<Event> = self
            .events
            .list_events()
            .await?
            .into_iter()
            .filter(|event| event.is_upcoming(now))
            .collect();
        sort_newest_first(&mut events);
        if let Some(take) = take {
            events.truncate(take);
        }

        self.summarize(events).await
    }

    /// Public detail of an active event, with the latest upcoming events
    pub async fn public_detail(&self, id: EventId, now: DateTime<Utc>) -> EventResult<EventDetail> {
        let event = self
            .events
            .get_event(id)
            .await?
            .filter(|event| event.is_active)
            .ok_or(EventError::NotFound(id))?;

        let mut detail = self.detail(event).await?;
        detail.latest = self
            .list_public(now, None)
            .await?
            .into_iter()
            .filter(|summary| summary.id != id)
            .take(LATEST_EVENTS)
            .collect();
        Ok(detail)
    }

    /// Upcoming events ordered by start
    pub async fn calendar(&self, now: DateTime<Utc>) -> EventResult<Vec<CalendarEntry>> {
        let mut events: Vec<Event> = self
            .events
            .list_events()
            .await?
            .into_iter()
            .filter(|event| event.is_upcoming(now))
            .collect();
        sort_by_start(&mut events);

        Ok(events
            .into_iter()
            .map(|event| CalendarEntry {
                id: event.id,
                title: event.title,
                start: event.start_date,
                end: event.end_date,
            })
            .collect())
    }

    /// All events ordered by start, optionally narrowed to one owner.
    /// Requires an identity; `created_by` takes precedence over `mine`.
    pub async fn list(
        &self,
        caller: Option<AccountId>,
        filter: EventFilter,
    ) -> EventResult<Vec<EventSummary>> {
        let caller = OwnershipGuard::require_identity(caller)?;
        let owner = match filter.created_by {
            Some(owner) => Some(owner),
            None if filter.mine => Some(caller),
            None => None,
        };

        let mut events: Vec<Event> = self
            .events
            .list_events()
            .await?
            .into_iter()
            .filter(|event| owner.map_or(true, |owner| event.owner_id == owner))
            .collect();
        sort_by_start(&mut events);

        self.summarize(events).await
    }

    pub async fn get(&self, id: EventId) -> EventResult<EventDetail> {
        let event = self.load(id).await?;
        self.detail(event).await
    }

    /// Create an event owned by the caller
    pub async fn create(
        &self,
        caller: Option<AccountId>,
        request: CreateEventRequest,
    ) -> EventResult<Event> {
        let owner_id = OwnershipGuard::require_identity(caller)?;
        validate(&request)?;

        let title = request.title.trim().to_string();
        if self.events.title_taken(&title, None).await? {
            debug!("Event creation refused, title in use");
            return Err(EventError::TitleTaken);
        }

        let event = self
            .events
            .insert_event(NewEvent {
                owner_id,
                title,
                start_date: request.start_date,
                end_date: request.end_date,
                short_description: request.short_description,
                long_description: request.long_description,
                image_path: request.image_path,
                is_active: request.is_active,
            })
            .await?;

        info!(event_id = %event.id, owner_id = %owner_id, "Event created");
        Ok(event)
    }

    /// Update an event; only its owner may, and the owner never changes
    pub async fn update(
        &self,
        caller: Option<AccountId>,
        id: EventId,
        request: UpdateEventRequest,
    ) -> EventResult<Event> {
        OwnershipGuard::require_identity(caller)?;
        let mut event = self.load(id).await?;
        OwnershipGuard::require_owner(caller, event.owner_id)?;
        validate(&request)?;

        let title = request.title.trim().to_string();
        if title != event.title && self.events.title_taken(&title, Some(id)).await? {
            return Err(EventError::TitleTaken);
        }

        event.title = title;
        event.start_date = request.start_date;
        event.end_date = request.end_date;
        event.short_description = request.short_description;
        event.long_description = request.long_description;
        event.image_path = request.image_path;
        event.is_active = request.is_active;

        self.events.update_event(&event).await?;
        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Delete an event; only its owner may
    pub async fn delete(&self, caller: Option<AccountId>, id: EventId) -> EventResult<()> {
        OwnershipGuard::require_identity(caller)?;
        let event = self.load(id).await?;
        OwnershipGuard::require_owner(caller, event.owner_id)?;

        self.events.delete_event(event.id).await?;
        info!(event_id = %event.id, "Event deleted");
        Ok(())
    }

    async fn load(&self, id: EventId) -> EventResult<Event> {
        self.events
            .get_event(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    async fn detail(&self, event: Event) -> EventResult<EventDetail> {
        let owner = self
            .accounts
            .get_account(event.owner_id)
            .await?
            .map(|account| EventOwner::from(&account));
        Ok(EventDetail::new(event, owner))
    }

    async fn summarize(&self, events: Vec<Event>) -> EventResult<Vec<EventSummary>> {
        let names: HashMap<AccountId, String> = self
            .accounts
            .list_accounts()
            .await?
            .into_iter()
            .map(|account| (account.id, account.name_surname))
            .collect();

        Ok(events
            .iter()
            .map(|event| event.to_summary(names.get(&event.owner_id).cloned()))
            .collect())
    }
}

fn sort_newest_first(events: &mut [Event]) {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

fn sort_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
}

fn validate(request: &CreateEventRequest) -> EventResult<()> {
    if request.title.trim().is_empty() {
        return Err(EventError::validation("title", "Title is required"));
    }
    if request.end_date < request.start_date {
        return Err(EventError::validation(
            "end_date",
            "End date must not be before the start date",
        ));
    }
    Ok(())
}
