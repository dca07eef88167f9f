//! Repository trait defining the persistence contract for personal access tokens.

use async_trait::async_trait;
use pat_shared::{PagedResult, Pagination};
use uuid::Uuid;

use crate::context::OperationContext;
use crate::domain::entities::personal_access_token::{PersonalAccessToken, TokenMetadataUpdate};
use crate::errors::{DomainError, DomainResult};

/// Operation names carried by errors and log lines
pub mod operations {
    pub const CREATE: &str = "create_personal_access_token";
    pub const GET: &str = "get_personal_access_token";
    pub const GET_FOR_USER: &str = "get_personal_access_token_for_user";
    pub const LIST_FOR_USER: &str = "list_personal_access_tokens_for_user";
    pub const UPDATE_FOR_USER: &str = "update_personal_access_token_for_user";
}

/// Repository trait for personal access token persistence
///
/// Implementations own no state between calls beyond the backend itself.
/// Every method honours the cancellation and deadline of `ctx`, classifies
/// backend failures into [`DomainError`] and never retries.
///
/// # Ordering
/// [`list_for_user`](Self::list_for_user) returns tokens newest first, ties
/// on `created_at` broken by `id` descending, so that a fixed data set
/// always splits into the same pages.
#[async_trait]
pub trait PersonalAccessTokenRepository: Send + Sync {
    /// Persist a new token
    ///
    /// If `ctx` is cancelled or expires while the write is in flight the
    /// token may still have been stored. Callers that retry after
    /// `Cancelled` or `DeadlineExceeded` should treat `Conflict` on the same
    /// id as success and confirm with [`get`](Self::get).
    ///
    /// # Arguments
    /// * `token` - Fully populated token; stored exactly as given
    ///
    /// # Returns
    /// * `Ok(PersonalAccessToken)` - The token as written
    /// * `Err(DomainError::Conflict)` - A token with this id already exists
    /// * `Err(DomainError::InvalidArgument)` - Empty or over-long hash, over-long
    ///   name, or nil identifiers
    /// * `Err(DomainError::Unavailable)` - Backend could not be reached
    ///
    /// # Example
    /// ```no_run
    /// # use pat_core::{OperationContext, PersonalAccessTokenRepository, PersonalAccessToken};
    /// # async fn example(repo: &impl PersonalAccessTokenRepository, token: PersonalAccessToken) -> Result<(), Box<dyn std::error::Error>> {
    /// let ctx = OperationContext::background();
    /// let saved = repo.create(&ctx, token).await?;
    /// println!("Token stored with ID: {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create(
        &self,
        ctx: &OperationContext,
        token: PersonalAccessToken,
    ) -> DomainResult<PersonalAccessToken>;

    /// Fetch a token by id
    ///
    /// # Returns
    /// * `Ok(PersonalAccessToken)` - Token found
    /// * `Err(DomainError::NotFound)` - No token with this id
    /// * `Err(DomainError::Unavailable)` - Backend error
    async fn get(&self, ctx: &OperationContext, id: Uuid) -> DomainResult<PersonalAccessToken>;

    /// List one page of the tokens owned by `user_id`
    ///
    /// `total` counts every token of the owner regardless of the requested
    /// window. A page past the end yields no results, not an error.
    ///
    /// # Returns
    /// * `Ok(PagedResult)` - The window and the owner's total
    /// * `Err(DomainError::InvalidArgument)` - `page < 1` or `page_size == 0`
    /// * `Err(DomainError::Unavailable)` - Backend error
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use pat_shared::Pagination;
    /// # use pat_core::{OperationContext, PersonalAccessTokenRepository};
    /// # async fn example(repo: &impl PersonalAccessTokenRepository, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    /// let ctx = OperationContext::background();
    /// let page = repo.list_for_user(&ctx, user_id, Pagination::new(1, 25)).await?;
    /// println!("Showing {} of {} tokens", page.results.len(), page.total);
    /// # Ok(())
    /// # }
    /// ```
    async fn list_for_user(
        &self,
        ctx: &OperationContext,
        user_id: Uuid,
        pagination: Pagination,
    ) -> DomainResult<PagedResult<PersonalAccessToken>>;

    /// Fetch a token only if `user_id` owns it
    ///
    /// A token owned by someone else is reported as not found.
    async fn get_for_user(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<PersonalAccessToken> {
        let token = self.get(ctx, id).await?;
        if token.user_id != user_id {
            return Err(DomainError::token_not_found(id));
        }
        Ok(token)
    }

    /// Change the name, description or scopes of a token owned by `user_id`
    ///
    /// Stamps `last_modified` with the current time and returns the updated
    /// token. The hash, owner, creation and expiration times are never
    /// touched.
    ///
    /// # Returns
    /// * `Err(DomainError::InvalidArgument)` - The update changes nothing or the
    ///   new name is too long
    /// * `Err(DomainError::NotFound)` - No such token for this owner
    async fn update_for_user(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        user_id: Uuid,
        update: TokenMetadataUpdate,
    ) -> DomainResult<PersonalAccessToken>;
}

/// Reject updates that would only bump the modification time or that
/// exceed the column limits
pub fn check_update(id: Uuid, update: &TokenMetadataUpdate) -> DomainResult<()> {
    if update.is_empty() {
        return Err(DomainError::invalid_argument(format!(
            "update for token {} does not change any field",
            id
        )));
    }
    update.validate(id)
}
