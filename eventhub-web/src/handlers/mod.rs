//! HTTP request handlers for the EventHub web server
//!
//! Handlers are thin: extract the caller, call the service, map the result.
//! Authorization decisions live in the application layer.

pub mod events;
pub mod health;
pub mod types;
pub mod users;

pub use events::*;
pub use health::*;
pub use types::*;
pub use users::*;
