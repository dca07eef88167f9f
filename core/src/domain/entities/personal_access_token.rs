//! Personal access token entity.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::providers::{Clock, IdGenerator};

/// Ordered list of permission strings attached to a token
///
/// The store never interprets the values. Persisted as a JSON array of
/// strings (`["read","write"]`), which keeps order and leaves room for
/// values containing separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scopes(Vec<String>);

impl Scopes {
    /// Column encoding
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Parse the column encoding
    ///
    /// An empty column is read as no scopes.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map(Self)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Scopes {
    fn from(scopes: Vec<String>) -> Self {
        Self(scopes)
    }
}

impl<'a> From<Vec<&'a str>> for Scopes {
    fn from(scopes: Vec<&'a str>) -> Self {
        Self(scopes.into_iter().map(str::to_owned).collect())
    }
}

/// Longest `name` a token may carry, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Longest `hash` a token may carry, in characters
pub const MAX_HASH_LENGTH: usize = 255;

/// A stored personal access token
///
/// Only the hash of the secret is ever held here. `user_id`, `hash` and
/// `created_at` do not change after creation; `last_modified` moves on
/// every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalAccessToken {
    /// Primary key
    pub id: Uuid,

    /// Owning principal, resolved outside this store
    pub user_id: Uuid,

    /// Hash of the secret
    pub hash: String,

    pub name: String,

    pub description: String,

    pub scopes: Scopes,

    /// Not enforced by the store
    pub expiration_time: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,
}

/// The caller-supplied part of a new token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPersonalAccessToken {
    pub user_id: Uuid,
    pub hash: String,
    pub name: String,
    pub description: String,
    pub scopes: Scopes,
    pub expiration_time: DateTime<Utc>,
}

impl PersonalAccessToken {
    /// Build a token from a draft, drawing the id and timestamps from the
    /// given providers
    pub fn issue(
        draft: NewPersonalAccessToken,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: ids.generate(),
            user_id: draft.user_id,
            hash: draft.hash,
            name: draft.name,
            description: draft.description,
            scopes: draft.scopes,
            expiration_time: draft.expiration_time,
            created_at: now,
            last_modified: now,
        }
    }

    /// Check the fields every stored token must carry
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.is_nil() {
            return Err(DomainError::invalid_argument("token id must not be nil"));
        }
        if self.user_id.is_nil() {
            return Err(DomainError::invalid_argument(format!(
                "token {} has a nil user id",
                self.id
            )));
        }
        if self.hash.trim().is_empty() {
            return Err(DomainError::invalid_argument(format!(
                "token {} has an empty hash",
                self.id
            )));
        }
        check_length(self.id, "hash", &self.hash, MAX_HASH_LENGTH)?;
        check_length(self.id, "name", &self.name, MAX_NAME_LENGTH)
    }

    /// Listing order: newest first, ties broken by id descending
    ///
    /// Total over all tokens, so page boundaries never move between calls
    /// on an unchanged data set.
    pub fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Changes to the mutable metadata of a token
///
/// Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMetadataUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub scopes: Option<Scopes>,
}

impl TokenMetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.scopes.is_none()
    }

    /// Check the new values against the stored column limits
    pub fn validate(&self, id: Uuid) -> DomainResult<()> {
        match &self.name {
            Some(name) => check_length(id, "name", name, MAX_NAME_LENGTH),
            None => Ok(()),
        }
    }

    /// Apply the changes and stamp `last_modified`
    pub fn apply_to(&self, token: &mut PersonalAccessToken, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            token.name = name.clone();
        }
        if let Some(description) = &self.description {
            token.description = description.clone();
        }
        if let Some(scopes) = &self.scopes {
            token.scopes = scopes.clone();
        }
        token.last_modified = now;
    }
}

fn check_length(id: Uuid, field: &str, value: &str, max: usize) -> DomainResult<()> {
    let length = value.chars().count();
    if length > max {
        return Err(DomainError::invalid_argument(format!(
            "token {} {} is {} characters long, at most {} allowed",
            id, field, length, max
        )));
    }
    Ok(())
}
