//! Classification of SQLx errors into the domain error taxonomy.

use pat_core::DomainError;
use sqlx::error::ErrorKind;
use sqlx::mysql::MySqlDatabaseError;

/// Server error numbers that clear up on their own: too many connections,
/// server shutdown, lock wait timeout, deadlock, server gone away and
/// connection lost mid-query
const TRANSIENT_SERVER_ERRORS: &[u16] = &[1040, 1053, 1205, 1213, 2006, 2013];

/// Server error numbers caused by the values a caller sent: column cannot be
/// null, out of range, incorrect value and data too long
const REJECTED_VALUE_ERRORS: &[u16] = &[1048, 1264, 1366, 1406];

/// Whether the error is a duplicate-key violation (MySQL 1062)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Map a backend error onto the domain taxonomy
///
/// - Connection, pool and transport failures become `Unavailable`.
/// - Errors the server reports for a statement go through
///   [`classify_server_error`].
/// - Decoding failures mean stored data does not match the entity and
///   become `Internal`.
pub fn classify(operation: &'static str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => {
            tracing::error!(operation, error = %err, "Database unreachable");
            DomainError::unavailable(operation, err.to_string())
        }
        sqlx::Error::Database(db_err) => {
            let number = db_err
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(MySqlDatabaseError::number);
            tracing::error!(
                operation,
                number,
                code = db_err.code().as_deref().unwrap_or("unknown"),
                error = %db_err,
                "Database rejected statement"
            );
            classify_server_error(operation, number, db_err.kind(), db_err.to_string())
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::RowNotFound => {
            tracing::error!(operation, error = %err, "Failed to read stored row");
            DomainError::Internal {
                message: format!("{}: {}", operation, err),
            }
        }
        other => {
            tracing::error!(operation, error = %other, "Database error");
            DomainError::unavailable(operation, other.to_string())
        }
    }
}

/// Map an error reported by the server for a statement
///
/// Only transient server conditions are `Unavailable`. Constraint and value
/// errors are the caller's input; anything else (syntax, missing table,
/// privileges) will fail again on retry and is `Internal`.
pub fn classify_server_error(
    operation: &'static str,
    number: Option<u16>,
    kind: ErrorKind,
    message: String,
) -> DomainError {
    if number.is_some_and(|n| TRANSIENT_SERVER_ERRORS.contains(&n)) {
        return DomainError::unavailable(operation, message);
    }
    if number.is_some_and(|n| REJECTED_VALUE_ERRORS.contains(&n)) {
        return DomainError::invalid_argument(format!("{}: {}", operation, message));
    }

    match kind {
        ErrorKind::UniqueViolation => DomainError::Conflict {
            resource: format!("{}: {}", operation, message),
        },
        ErrorKind::ForeignKeyViolation | ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            DomainError::invalid_argument(format!("{}: {}", operation, message))
        }
        _ => DomainError::Internal {
            message: format!("{}: {}", operation, message),
        },
    }
}
