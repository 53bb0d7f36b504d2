//! Unified error handling system
//!
//! Structured error types with context, recovery suggestions and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub type EventHubResult<T> = Result<T, EventHubError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for EventHub infrastructure
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl EventHubError {
    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            EventHubError::Config { context, .. } => context,
        }
    }

    /// Log the error with its tracking id and recovery hints
    pub fn log(&self) {
        let context = self.context();
        error!(
            error_id = %context.error_id,
            component = %context.component,
            operation = ?context.operation,
            suggestions = ?context.recovery_suggestions,
            error = %self,
            "Fatal configuration error"
        );
    }
}

/// Configuration error with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::EventHubError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file and environment variables"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_macro_carries_context() {
        let err = config_error!("signing key is missing", "config");
        assert!(err.to_string().contains("signing key is missing"));

        let context = err.context();
        assert_eq!(context.component, "config");
        assert!(!context.recovery_suggestions.is_empty());
        assert!(!context.error_id.is_empty());
    }

    #[test]
    fn test_context_builder() {
        let context = ErrorContext::new("config")
            .with_operation("validate")
            .with_metadata("field", "auth.signing_key");
        assert_eq!(context.operation.as_deref(), Some("validate"));
        assert_eq!(context.metadata["field"], "auth.signing_key");
    }
}
