//! Error context for enriched error information.

use chrono::{DateTime, Utc};

/// Context information attached to errors for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Human-readable description of the operation that failed.
    pub operation: String,

    /// Record the operation targeted (diagnosis id, cattle tag, ...).
    pub resource_id: Option<String>,

    /// Component where the error originated.
    pub component: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource_id: None,
            component: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the resource id for this context.
    pub fn with_resource_id(mut self, id: impl ToString) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    /// Set the component for this context.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref id) = self.resource_id {
            parts.push(format!("resource_id={}", id));
        }
        if let Some(ref component) = self.component {
            parts.push(format!("component={}", component));
        }
        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;
        if let Some(ref id) = self.resource_id {
            write!(f, " id={}", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let ctx = ErrorContext::new("review_diagnosis")
            .with_resource_id(42)
            .with_component("api");

        assert_eq!(ctx.operation, "review_diagnosis");
        assert_eq!(ctx.resource_id.as_deref(), Some("42"));
        assert_eq!(ctx.component.as_deref(), Some("api"));
    }

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("delete_cattle").with_resource_id("7");
        assert_eq!(ctx.to_string(), "[delete_cattle] id=7");
        assert_eq!(ErrorContext::new("load").to_string(), "[load]");
    }

    #[test]
    fn test_context_to_log_string() {
        let ctx = ErrorContext::new("login").with_component("session");
        let log = ctx.to_log_string();
        assert!(log.contains("operation=login"));
        assert!(log.contains("component=session"));
        assert!(log.contains("timestamp="));
        assert!(!log.contains("resource_id="));
    }
}
