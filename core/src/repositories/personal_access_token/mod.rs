//! Personal access token repository module.

mod r#trait;
pub use r#trait::{check_update, operations, PersonalAccessTokenRepository};

mod memory;
pub use memory::InMemoryPersonalAccessTokenRepository;
