//! # Infrastructure Layer
//!
//! Concrete implementations for the personal access token store:
//! - **Database**: MySQL pool, schema migrations and the token repository
//! - **Telemetry**: tracing subscriber bootstrap

// Re-export core types for convenience
pub use pat_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
