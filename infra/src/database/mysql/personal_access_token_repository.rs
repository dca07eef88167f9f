//! MySQL implementation of the PersonalAccessTokenRepository trait.
//!
//! Tokens live in `d_b_personal_access_token`. Identifiers are stored as
//! hyphenated lowercase UUID strings, whose byte order matches `Uuid`
//! ordering, so the `id DESC` tie-break agrees with the in-memory
//! repository. Timestamps are `DATETIME(6)` (microsecond precision).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use pat_core::repositories::personal_access_token::{check_update, operations};
use pat_core::{
    Clock, DomainError, DomainResult, OperationContext, PersonalAccessToken,
    PersonalAccessTokenRepository, Scopes, SystemClock, TokenMetadataUpdate,
};
use pat_shared::{PagedResult, Pagination};

use crate::database::errors::{classify, is_unique_violation};

const SELECT_COLUMNS: &str = r#"
    SELECT id, userId, hash, name, description, scopes,
           expirationTime, createdAt, _lastModified
    FROM d_b_personal_access_token
"#;

/// MySQL implementation of PersonalAccessTokenRepository
pub struct MySqlPersonalAccessTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
    /// Source of `last_modified` on updates
    clock: Arc<dyn Clock>,
}

impl MySqlPersonalAccessTokenRepository {
    /// Create a new MySQL token repository using the system clock
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create a repository stamping updates from `clock`
    pub fn with_clock(pool: MySqlPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Convert database row to PersonalAccessToken entity
    fn row_to_token(row: &MySqlRow) -> Result<PersonalAccessToken, DomainError> {
        let id: String = row.try_get("id").map_err(|e| internal("id", e))?;
        let user_id: String = row.try_get("userId").map_err(|e| internal("userId", e))?;
        let scopes: String = row.try_get("scopes").map_err(|e| internal("scopes", e))?;

        Ok(PersonalAccessToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID '{}': {}", id, e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID '{}' on token {}: {}", user_id, id, e),
            })?,
            hash: row.try_get("hash").map_err(|e| internal("hash", e))?,
            name: row.try_get("name").map_err(|e| internal("name", e))?,
            description: row
                .try_get("description")
                .map_err(|e| internal("description", e))?,
            scopes: Scopes::decode(&scopes).map_err(|e| DomainError::Internal {
                message: format!("Invalid scopes on token {}: {}", id, e),
            })?,
            expiration_time: row
                .try_get::<DateTime<Utc>, _>("expirationTime")
                .map_err(|e| internal("expirationTime", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("createdAt")
                .map_err(|e| internal("createdAt", e))?,
            last_modified: row
                .try_get::<DateTime<Utc>, _>("_lastModified")
                .map_err(|e| internal("_lastModified", e))?,
        })
    }
}

fn internal(column: &str, err: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to get {}: {}", column, err),
    }
}

fn encode_scopes(id: Uuid, scopes: &Scopes) -> DomainResult<String> {
    scopes.encode().map_err(|e| DomainError::Internal {
        message: format!("Failed to encode scopes of token {}: {}", id, e),
    })
}

#[async_trait]
impl PersonalAccessTokenRepository for MySqlPersonalAccessTokenRepository {
    async fn create(
        &self,
        ctx: &OperationContext,
        token: PersonalAccessToken,
    ) -> DomainResult<PersonalAccessToken> {
        token.validate()?;
        let id = token.id;
        let scopes = encode_scopes(id, &token.scopes)?;

        ctx.run(operations::CREATE, async {
            let query = r#"
                INSERT INTO d_b_personal_access_token (
                    id, userId, hash, name, description, scopes,
                    expirationTime, createdAt, _lastModified
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#;

            sqlx::query(query)
                .bind(id.to_string())
                .bind(token.user_id.to_string())
                .bind(&token.hash)
                .bind(&token.name)
                .bind(&token.description)
                .bind(&scopes)
                .bind(token.expiration_time)
                .bind(token.created_at)
                .bind(token.last_modified)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        tracing::warn!(token_id = %id, "Personal access token id already in use");
                        DomainError::token_conflict(id)
                    } else {
                        classify(operations::CREATE, e)
                    }
                })?;

            tracing::debug!(token_id = %id, user_id = %token.user_id, "Personal access token created");
            Ok(token)
        })
        .await
    }

    async fn get(&self, ctx: &OperationContext, id: Uuid) -> DomainResult<PersonalAccessToken> {
        ctx.run(operations::GET, async {
            let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

            let row = sqlx::query(&query)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| classify(operations::GET, e))?;

            match row {
                Some(row) => Self::row_to_token(&row),
                None => Err(DomainError::token_not_found(id)),
            }
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
            let op = operations::LIST_FOR_USER;
            let owner = user_id.to_string();

            // Count and window share one transaction, hence one snapshot
            let mut tx = self.pool.begin().await.map_err(|e| classify(op, e))?;

            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM d_b_personal_access_token WHERE userId = ?",
            )
            .bind(&owner)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| classify(op, e))?;

            let query = format!(
                "{} WHERE userId = ? ORDER BY createdAt DESC, id DESC LIMIT ? OFFSET ?",
                SELECT_COLUMNS
            );
            let rows = sqlx::query(&query)
                .bind(&owner)
                .bind(pagination.limit())
                .bind(pagination.offset())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| classify(op, e))?;

            tx.commit().await.map_err(|e| classify(op, e))?;

            let results = rows
                .iter()
                .map(Self::row_to_token)
                .collect::<DomainResult<Vec<_>>>()?;
            let total = u64::try_from(total).unwrap_or_default();

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

    async fn get_for_user(
        &self,
        ctx: &OperationContext,
        id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<PersonalAccessToken> {
        ctx.run(operations::GET_FOR_USER, async {
            let query = format!("{} WHERE id = ? AND userId = ? LIMIT 1", SELECT_COLUMNS);

            let row = sqlx::query(&query)
                .bind(id.to_string())
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| classify(operations::GET_FOR_USER, e))?;

            match row {
                Some(row) => Self::row_to_token(&row),
                None => Err(DomainError::token_not_found(id)),
            }
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
            let op = operations::UPDATE_FOR_USER;
            let mut tx = self.pool.begin().await.map_err(|e| classify(op, e))?;

            let query = format!(
                "{} WHERE id = ? AND userId = ? LIMIT 1 FOR UPDATE",
                SELECT_COLUMNS
            );
            let row = sqlx::query(&query)
                .bind(id.to_string())
                .bind(user_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| classify(op, e))?
                .ok_or_else(|| DomainError::token_not_found(id))?;

            let mut token = Self::row_to_token(&row)?;
            update.apply_to(&mut token, self.clock.now());
            let scopes = encode_scopes(id, &token.scopes)?;

            sqlx::query(
                r#"
                UPDATE d_b_personal_access_token
                SET name = ?, description = ?, scopes = ?, _lastModified = ?
                WHERE id = ?
                "#,
            )
            .bind(&token.name)
            .bind(&token.description)
            .bind(&scopes)
            .bind(token.last_modified)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(op, e))?;

            tx.commit().await.map_err(|e| classify(op, e))?;

            tracing::debug!(token_id = %id, user_id = %user_id, "Personal access token updated");
            Ok(token)
        })
        .await
    }
}
