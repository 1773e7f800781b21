//! Error type for timetable store operations.
//!
//! A structured-context + thiserror-variants idiom, narrowed to what an
//! in-memory, single-backend store actually raises; connection/transaction/
//! timeout variants and Diesel/Postgres conversions belong to a backend
//! this crate doesn't have.

use std::fmt;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Structured context for store errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={op}"));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={id}"));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={details}"));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {message} {context}")]
    NotFound { message: String, context: ErrorContext },

    #[error("validation error: {message} {context}")]
    Validation { message: String, context: ErrorContext },

    #[error("internal error: {message} {context}")]
    Internal { message: String, context: ErrorContext },
}

impl StoreError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound {
            message: "timetable not found".into(),
            context: ErrorContext::new("get").with_entity_id(id),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
