//! Unit tests for domain error types

use pat_shared::{Pagination, PaginationError};
use uuid::Uuid;

use crate::errors::DomainError;

#[test]
fn test_not_found_names_the_token() {
    let id = Uuid::new_v4();
    let error = DomainError::token_not_found(id);
    assert_eq!(error.code(), "NOT_FOUND");
    assert!(error.to_string().contains(&id.to_string()));
}

#[test]
fn test_conflict_names_the_token() {
    let id = Uuid::new_v4();
    let error = DomainError::token_conflict(id);
    assert_eq!(error.code(), "CONFLICT");
    assert!(error.to_string().contains(&id.to_string()));
    assert!(error.to_string().contains("already exists"));
}

#[test]
fn test_unavailable_is_the_only_retryable_error() {
    assert!(DomainError::unavailable("get_personal_access_token", "pool timed out").is_retryable());
    assert!(!DomainError::invalid_argument("bad").is_retryable());
    assert!(!DomainError::token_conflict(Uuid::new_v4()).is_retryable());
    assert!(!DomainError::Cancelled { operation: "create_personal_access_token" }.is_retryable());
    assert!(!DomainError::DeadlineExceeded { operation: "create_personal_access_token" }.is_retryable());
}

#[test]
fn test_unavailable_message_keeps_operation() {
    let error = DomainError::unavailable("list_personal_access_tokens_for_user", "connection refused");
    let message = error.to_string();
    assert!(message.contains("list_personal_access_tokens_for_user"));
    assert!(message.contains("connection refused"));
}

#[test]
fn test_pagination_error_becomes_invalid_argument() {
    let err = Pagination::new(0, 5).check().unwrap_err();
    assert_eq!(err, PaginationError::PageOutOfRange { page: 0 });

    let error: DomainError = err.into();
    assert!(matches!(error, DomainError::InvalidArgument { .. }));
    assert_eq!(error.code(), "INVALID_ARGUMENT");
}
