//! Domain entities representing stored credentials.

pub mod personal_access_token;

// Re-export commonly used types
pub use personal_access_token::{
    NewPersonalAccessToken, PersonalAccessToken, Scopes, TokenMetadataUpdate, MAX_HASH_LENGTH,
    MAX_NAME_LENGTH,
};

#[cfg(test)]
mod tests;
