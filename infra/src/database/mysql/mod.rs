//! MySQL repository implementations

mod personal_access_token_repository;

pub use personal_access_token_repository::MySqlPersonalAccessTokenRepository;
