//! # Personal Access Token Core
//!
//! Domain layer for the personal access token store: the token entity, the
//! error taxonomy, caller-scoped cancellation, identifier and clock
//! providers, and the repository contract with an in-memory implementation.

pub mod context;
pub mod domain;
pub mod errors;
pub mod providers;
pub mod repositories;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use context::OperationContext;
pub use domain::{
    NewPersonalAccessToken, PersonalAccessToken, Scopes, TokenMetadataUpdate, MAX_HASH_LENGTH,
    MAX_NAME_LENGTH,
};
pub use errors::{DomainError, DomainResult};
pub use providers::{Clock, FixedClock, IdGenerator, RandomIdGenerator, SystemClock};
pub use repositories::{InMemoryPersonalAccessTokenRepository, PersonalAccessTokenRepository};
