//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management and schema migrations
//! - Classification of SQLx errors into domain errors
//! - Repository implementations

pub mod connection;
pub mod errors;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlPersonalAccessTokenRepository;
