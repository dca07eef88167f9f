//! Domain layer containing the token entity and its value types.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
