//! Shared configuration and common types for the token store
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types (database pool, environment, logging)
//! - Pagination request and paged result types

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig};
pub use types::{PagedResult, Pagination, PaginationError};
