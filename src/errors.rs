//! Structured error types for the SIMGuard backend.

use thiserror::Error;

/// Main error type for the SIMGuard service
#[derive(Error, Debug)]
pub enum SimGuardError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Result with SimGuardError
pub type SimGuardResult<T> = Result<T, SimGuardError>;

impl SimGuardError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for SimGuardError {
    fn from(err: serde_json::Error) -> Self {
        SimGuardError::internal(format!("JSON serialization failed: {err}"))
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for SimGuardError {
    fn from(err: std::io::Error) -> Self {
        SimGuardError::io("io_operation", err)
    }
}
