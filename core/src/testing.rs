//! Fixture builders for token store tests.
//!
//! Override fields with struct update syntax, e.g.
//! `PersonalAccessToken { user_id, ..token_fixture() }`.

use chrono::{Duration, DurationRound, Utc};
use uuid::Uuid;

use crate::context::OperationContext;
use crate::domain::entities::personal_access_token::{PersonalAccessToken, Scopes};
use crate::errors::DomainResult;
use crate::repositories::PersonalAccessTokenRepository;

/// A valid token with random identifiers and default metadata
///
/// Timestamps are truncated to whole microseconds so that they survive a
/// round trip through a `DATETIME(6)` column unchanged.
pub fn token_fixture() -> PersonalAccessToken {
    let now = Utc::now();
    let now = now.duration_trunc(Duration::microseconds(1)).unwrap_or(now);
    let id = Uuid::new_v4();

    PersonalAccessToken {
        id,
        user_id: Uuid::new_v4(),
        hash: format!("some-secure-hash-{}", id.simple()),
        name: "some-name".to_string(),
        description: "some-description".to_string(),
        scopes: Scopes::from(vec!["read", "write"]),
        expiration_time: now + Duration::days(30),
        created_at: now,
        last_modified: now,
    }
}

/// Store every token, stopping at the first failure
pub async fn create_token_records<R>(
    repo: &R,
    tokens: Vec<PersonalAccessToken>,
) -> DomainResult<Vec<PersonalAccessToken>>
where
    R: PersonalAccessTokenRepository + ?Sized,
{
    let ctx = OperationContext::background();
    let mut created = Vec::with_capacity(tokens.len());
    for token in tokens {
        created.push(repo.create(&ctx, token).await?);
    }
    Ok(created)
}
