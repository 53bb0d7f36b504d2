//! EventHub Core - shared foundations
//!
//! Error handling, configuration, logging and the identifier types every
//! other EventHub crate builds on.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
