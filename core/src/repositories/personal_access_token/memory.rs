//! In-memory implementation of PersonalAccessTokenRepository
//!
//! Follows the same ordering, windowing and error rules as the MySQL
//! implementation. Every read takes one guard, so `results` and `total`
//! always come from the same snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pat_shared::{PagedResult, Pagination};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::context::OperationContext;
use crate::domain::entities::personal_access_token::{PersonalAccessToken, TokenMetadataUpdate};
use crate::errors::{DomainError, DomainResult};
use crate::providers::{Clock, SystemClock};

use super::r#trait::{check_update, operations, PersonalAccessTokenRepository};

/// Token repository backed by a process-local map
#[derive(Clone)]
pub struct InMemoryPersonalAccessTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, PersonalAccessToken>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPersonalAccessTokenRepository {
    /// Create a new empty repository using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a new empty repository stamping updates from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored tokens across all owners
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

impl Default for InMemoryPersonalAccessTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonalAccessTokenRepository for InMemoryPersonalAccessTokenRepository {
    async fn create(
        &self,
        ctx: &OperationContext,
        token: PersonalAccessToken,
    ) -> DomainResult<PersonalAccessToken> {
        token.validate()?;

        ctx.run(operations::CREATE, async {
            let mut tokens = self.tokens.write().await;

            if tokens.contains_key(&token.id) {
                tracing::warn!(token_id = %token.id, "Personal access token id already in use");
                return Err(DomainError::token_conflict(token.id));
            }

            tokens.insert(token.id, token.clone());
            tracing::debug!(token_id = %token.id, user_id = %token.user_id, "Personal access token created");
            Ok(token)
        })
        .await
    }

    async fn get(&self, ctx: &OperationContext, id: Uuid) -> DomainResult<PersonalAccessToken> {
        ctx.run(operations::GET, async {
            let tokens = self.tokens.read().await;
            tokens
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::token_not_found(id))
        })
        .await
    }

    async fn list_for_user(
        &self,
        ctx: &OperationContext,
        user_id: Uuid,
        pagination: Pagination,
    ) -> DomainResult<PagedResult<PersonalAccessToken>> {
        pagination.check()?;

        ctx.run(operations::LIST_FOR_USER, async {
            let tokens = self.tokens.read().await;

            let mut owned: Vec<&PersonalAccessToken> =
                tokens.values().filter(|t| t.user_id == user_id).collect();
            owned.sort_by(|a, b| PersonalAccessToken::listing_order(a, b));

            let total = owned.len() as u64;
            let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);

            let results: Vec<PersonalAccessToken> = owned
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect();

            tracing::debug!(
                user_id = %user_id,
                page = pagination.page,
                page_size = pagination.page_size,
                returned = results.len(),
                total,
                "Listed personal access tokens"
            );

            Ok(PagedResult::new(results, total))
        })
        .await
    }

    async fn update_for_user(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        user_id: Uuid,
        update: TokenMetadataUpdate,
    ) -> DomainResult<PersonalAccessToken> {
        check_update(id, &update)?;

        ctx.run(operations::UPDATE_FOR_USER, async {
            let mut tokens = self.tokens.write().await;

            let token = tokens
                .get_mut(&id)
                .filter(|t| t.user_id == user_id)
                .ok_or_else(|| DomainError::token_not_found(id))?;

            update.apply_to(token, self.clock.now());
            tracing::debug!(token_id = %id, user_id = %user_id, "Personal access token updated");
            Ok(token.clone())
        })
        .await
    }
}
