//! API key store - lookup and creation of API key records.
//!
//! Records are created once and read back by key. Token counters are only
//! initialised here; nothing in this module updates or deletes a record.
//!
//! # Errors
//!
//! Constraint violations raised by the database (duplicate key, unknown
//! owner) are returned as `AppError::Database` without translation.

use chrono::Utc;

use crate::{
    db::DbPool,
    error::AppError,
    models::api_key::{ApiKeyRecord, MAX_API_KEY_LEN, NewApiKey},
};

/// Token budget defaults applied when a key is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    free_tokens: i64,
}

impl TokenPolicy {
    pub fn new(free_tokens: i64) -> Self {
        Self { free_tokens }
    }

    pub fn free_tokens(&self) -> i64 {
        self.free_tokens
    }

    /// Pick the token limit for a new key.
    ///
    /// A missing or zero limit means the free-tier budget.
    pub fn resolve(&self, token_limit: Option<i64>) -> Result<i64, AppError> {
        match token_limit {
            Some(limit) if limit < 0 => Err(AppError::InvalidRequest(
                "Token limit must not be negative".to_string(),
            )),
            Some(limit) if limit > 0 => Ok(limit),
            _ => Ok(self.free_tokens),
        }
    }
}

/// Find the record whose `api_key` equals `api_key` exactly.
///
/// Matching is case-sensitive with no normalization. Returns `Ok(None)`
/// when no record matches.
pub async fn lookup_by_key(
    pool: &DbPool,
    api_key: &str,
) -> Result<Option<ApiKeyRecord>, AppError> {
    let record = sqlx::query_as::<_, ApiKeyRecord>("SELECT * FROM api_list WHERE api_key = $1")
        .bind(api_key)
        .fetch_optional(pool)
        .await?;

    Ok(record)
}

/// Create and persist a new API key record.
///
/// # Process
///
/// 1. Resolve the token limit (explicit value or free-tier budget)
/// 2. Insert the row inside a transaction and commit
/// 3. Reload the row so store-assigned fields are populated
///
/// The resolved limit is written to `total_tokens`, `tokens_remaining` and
/// `token_limit_per_day`. `created_at` is taken at insert time.
///
/// # Errors
///
/// - `InvalidRequest`: key is empty or longer than 64 characters, or the limit is negative
/// - `Database`: unique violation if the key exists, foreign key violation
///   if `owner_user_id` is not a user, or any other database error
pub async fn create_entry(
    pool: &DbPool,
    policy: &TokenPolicy,
    owner_user_id: i64,
    api_key: &str,
    instructions: Option<String>,
    label: Option<String>,
    token_limit: Option<i64>,
) -> Result<ApiKeyRecord, AppError> {
    if api_key.is_empty() || api_key.chars().count() > MAX_API_KEY_LEN {
        return Err(AppError::InvalidRequest(format!(
            "API key must be between 1 and {MAX_API_KEY_LEN} characters"
        )));
    }

    let limit = policy.resolve(token_limit)?;
    let entry = NewApiKey::new(owner_user_id, api_key, policy.free_tokens())
        .with_daily_limit(limit)
        .with_label(label)
        .with_instructions(instructions);

    let id = insert(pool, &entry).await?;

    let record = sqlx::query_as::<_, ApiKeyRecord>("SELECT * FROM api_list WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;

    tracing::info!(
        api_key_id = record.id,
        owner_user_id = record.owner_user_id,
        total_tokens = record.total_tokens,
        "API key created"
    );

    Ok(record)
}

/// List every record owned by `owner_user_id`, newest first.
pub async fn list_for_owner(
    pool: &DbPool,
    owner_user_id: i64,
) -> Result<Vec<ApiKeyRecord>, AppError> {
    let records = sqlx::query_as::<_, ApiKeyRecord>(
        "SELECT * FROM api_list WHERE owner_user_id = $1 ORDER BY id DESC",
    )
    .bind(owner_user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

async fn insert(pool: &DbPool, entry: &NewApiKey) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO api_list (
            label,
            owner_user_id,
            api_key,
            instructions,
            created_at,
            total_tokens,
            tokens_used,
            tokens_remaining,
            token_limit_per_day
        )
        VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8)
        "#,
    )
    .bind(&entry.label)
    .bind(entry.owner_user_id)
    .bind(&entry.api_key)
    .bind(&entry.instructions)
    .bind(Utc::now())
    .bind(entry.total_tokens)
    .bind(entry.tokens_remaining)
    .bind(entry.token_limit_per_day)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    Ok(id)
}
