//! Events: public listings and owner-only management

pub mod service;
pub mod types;

pub use service::{EventError, EventResult, EventService, LATEST_EVENTS};
pub use types::{
    CalendarEntry, CreateEventRequest, Event, EventDetail, EventFilter, EventOwner, EventSummary,
    NewEvent, UpdateEventRequest,
};
