//! Domain error taxonomy for token store operations.

use pat_shared::PaginationError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by every token store operation
///
/// Backend failures are classified into one of these variants and never
/// swallowed. Each message names the operation or identifier involved so
/// callers can log it without extra context.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Conflict: {resource} already exists")]
    Conflict { resource: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Backend unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    #[error("Operation {operation} was cancelled")]
    Cancelled { operation: &'static str },

    #[error("Operation {operation} exceeded its deadline")]
    DeadlineExceeded { operation: &'static str },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Invalid caller input
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            message: message.into(),
        }
    }

    /// No personal access token with this id
    pub fn token_not_found(id: Uuid) -> Self {
        DomainError::NotFound {
            resource: format!("personal access token {}", id),
        }
    }

    /// A personal access token with this id is already stored
    pub fn token_conflict(id: Uuid) -> Self {
        DomainError::Conflict {
            resource: format!("personal access token {}", id),
        }
    }

    /// Backend could not serve the operation
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        DomainError::Unavailable {
            operation,
            message: message.into(),
        }
    }

    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            DomainError::Conflict { .. } => "CONFLICT",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Unavailable { .. } => "UNAVAILABLE",
            DomainError::Cancelled { .. } => "CANCELLED",
            DomainError::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
            DomainError::Internal { .. } => "INTERNAL",
        }
    }

    /// Whether a caller may reasonably retry the same request
    ///
    /// Only transient backend failures qualify. The store itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Unavailable { .. })
    }
}

impl From<PaginationError> for DomainError {
    fn from(err: PaginationError) -> Self {
        DomainError::InvalidArgument {
            message: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
