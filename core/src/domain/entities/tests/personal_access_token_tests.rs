//! Unit tests for the personal access token entity

use std::cmp::Ordering;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::personal_access_token::{
    NewPersonalAccessToken, PersonalAccessToken, Scopes, TokenMetadataUpdate, MAX_HASH_LENGTH,
    MAX_NAME_LENGTH,
};
use crate::errors::DomainError;
use crate::providers::{FixedClock, IdGenerator, RandomIdGenerator};

/// Test-only lookups over the public `as_slice` view
trait ScopesTestExt {
    fn contains(&self, scope: &str) -> bool;
    fn is_empty(&self) -> bool;
}

impl ScopesTestExt for Scopes {
    fn contains(&self, scope: &str) -> bool {
        self.as_slice().iter().any(|s| s == scope)
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

fn draft(user_id: Uuid) -> NewPersonalAccessToken {
    NewPersonalAccessToken {
        user_id,
        hash: "some-secure-hash".to_string(),
        name: "some-name".to_string(),
        description: "some-description".to_string(),
        scopes: Scopes::from(vec!["read", "write"]),
        expiration_time: Utc::now() + Duration::days(30),
    }
}

struct SequenceIds(Uuid);

impl IdGenerator for SequenceIds {
    fn generate(&self) -> Uuid {
        self.0
    }
}

#[test]
fn test_issue_assigns_id_and_timestamps() {
    let now = Utc::now();
    let clock = FixedClock::new(now);
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let token = PersonalAccessToken::issue(draft(user_id), &SequenceIds(id), &clock);

    assert_eq!(token.id, id);
    assert_eq!(token.user_id, user_id);
    assert_eq!(token.created_at, now);
    assert_eq!(token.last_modified, now);
    assert_eq!(token.scopes.as_slice(), ["read", "write"]);
    assert!(token.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_hash() {
    let mut token =
        PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &FixedClock::new(Utc::now()));
    token.hash = "   ".to_string();

    let err = token.validate().unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));
    assert!(err.to_string().contains("empty hash"));
}

#[test]
fn test_validate_enforces_column_limits() {
    let mut token =
        PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &FixedClock::new(Utc::now()));

    // Limits count characters, not bytes
    token.name = "é".repeat(MAX_NAME_LENGTH);
    token.hash = "h".repeat(MAX_HASH_LENGTH);
    assert!(token.validate().is_ok());

    token.name = "n".repeat(MAX_NAME_LENGTH + 1);
    let err = token.validate().unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));
    assert!(err.to_string().contains("name"));

    token.name = "some-name".to_string();
    token.hash = "h".repeat(MAX_HASH_LENGTH + 1);
    let err = token.validate().unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));
    assert!(err.to_string().contains("hash"));
}

#[test]
fn test_validate_rejects_nil_ids() {
    let clock = FixedClock::new(Utc::now());

    let mut token = PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &clock);
    token.id = Uuid::nil();
    assert!(matches!(token.validate(), Err(DomainError::InvalidArgument { .. })));

    let token = PersonalAccessToken::issue(draft(Uuid::nil()), &RandomIdGenerator, &clock);
    assert!(matches!(token.validate(), Err(DomainError::InvalidArgument { .. })));
}

#[test]
fn test_listing_order_newest_first_then_id() {
    let clock = FixedClock::new(Utc::now());
    let older = PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &clock);
    clock.advance(Duration::seconds(1));
    let newer = PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &clock);

    assert_eq!(PersonalAccessToken::listing_order(&newer, &older), Ordering::Less);
    assert_eq!(PersonalAccessToken::listing_order(&older, &newer), Ordering::Greater);

    let mut low = newer.clone();
    low.id = Uuid::from_u128(1);
    let mut high = newer.clone();
    high.id = Uuid::from_u128(2);
    assert_eq!(PersonalAccessToken::listing_order(&high, &low), Ordering::Less);
    assert_eq!(PersonalAccessToken::listing_order(&low, &low), Ordering::Equal);
}

#[test]
fn test_scopes_encoding_keeps_order() {
    let scopes = Scopes::from(vec!["write", "read", "admin:org,repo"]);
    let encoded = scopes.encode().unwrap();
    assert_eq!(encoded, r#"["write","read","admin:org,repo"]"#);

    let decoded = Scopes::decode(&encoded).unwrap();
    assert_eq!(decoded, scopes);
    assert!(decoded.contains("admin:org,repo"));
}

#[test]
fn test_scopes_decode_empty_column() {
    assert!(Scopes::decode("").unwrap().is_empty());
    assert!(Scopes::decode("[]").unwrap().is_empty());
    assert!(Scopes::decode("read,write").is_err());
}

#[test]
fn test_metadata_update_touches_only_mutable_fields() {
    let created = Utc::now();
    let clock = FixedClock::new(created);
    let mut token = PersonalAccessToken::issue(draft(Uuid::new_v4()), &RandomIdGenerator, &clock);
    let original = token.clone();

    let update = TokenMetadataUpdate {
        name: Some("renamed".to_string()),
        scopes: Some(Scopes::from(vec!["read"])),
        ..Default::default()
    };
    assert!(!update.is_empty());

    let later = created + Duration::minutes(5);
    update.apply_to(&mut token, later);

    assert_eq!(token.name, "renamed");
    assert_eq!(token.description, original.description);
    assert_eq!(token.scopes.as_slice(), ["read"]);
    assert_eq!(token.last_modified, later);
    assert_eq!(token.created_at, original.created_at);
    assert_eq!(token.hash, original.hash);
    assert_eq!(token.user_id, original.user_id);
}

#[test]
fn test_empty_metadata_update() {
    assert!(TokenMetadataUpdate::default().is_empty());
}
