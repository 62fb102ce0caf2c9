//! Tracker error types
//!
//! Every failure the presentation layer can surface maps to one variant here.
//! Bad timestamps are not errors: they derive to [`crate::age::Age::NotCreated`].

use thiserror::Error;

use crate::state::EscalationId;

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur while talking to a data source or driving a session
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The data source could not be reached or rejected the request
    #[error("Data source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// A get/update/delete targeted an id the source does not know
    #[error("Escalation not found: {id}")]
    RecordNotFound { id: EscalationId },

    /// Client-side validation failed; nothing was sent
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The caller is not authenticated
    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller's role does not permit the action
    #[error("Role {role} may not {action}")]
    PermissionDenied { action: &'static str, role: String },

    /// Local storage I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored or received data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TrackerError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::RecordNotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Storage(_) => "STORAGE",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Config { .. } => "CONFIG",
        }
    }

    /// Whether the error replaces the whole view (no partial data is shown).
    ///
    /// Validation and permission errors are reported inline next to the form.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            Self::Validation { .. } | Self::PermissionDenied { .. }
        )
    }
}
