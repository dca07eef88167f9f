pub mod personal_access_token;

pub use personal_access_token::{
    InMemoryPersonalAccessTokenRepository, PersonalAccessTokenRepository,
};
