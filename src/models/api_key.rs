//! API key record model and API request types.
//!
//! Each record is an API key issued to a user together with the token budget
//! attached to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest API key the `api_list` table accepts.
pub const MAX_API_KEY_LEN: usize = 64;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_list` table. Each record:
/// - Belongs to one user (via `owner_user_id`)
/// - Owns its documents; deleting the record deletes them (`ON DELETE CASCADE`)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ApiKeyRecord {
    /// Store-assigned identifier
    pub id: i64,

    /// Optional human-readable name
    pub label: Option<String>,

    /// User that owns this key
    pub owner_user_id: i64,

    /// The key itself, unique across all records
    pub api_key: String,

    /// Free-form processing directive for requests made with this key
    pub instructions: Option<String>,

    /// Set once when the row is inserted
    pub created_at: DateTime<Utc>,

    /// Never written by this service
    pub last_used_at: Option<DateTime<Utc>>,

    /// Budget ceiling
    pub total_tokens: i64,

    pub tokens_used: i64,

    pub tokens_remaining: i64,

    /// Daily cap, if any
    pub token_limit_per_day: Option<i64>,
}

/// A record that has not been inserted yet.
///
/// Token counters start at the free-tier budget. Supplying a daily limit
/// through [`NewApiKey::with_daily_limit`] resets both `total_tokens` and
/// `tokens_remaining` to that limit; nothing keeps them in sync afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApiKey {
    pub owner_user_id: i64,
    pub api_key: String,
    pub label: Option<String>,
    pub instructions: Option<String>,
    pub total_tokens: i64,
    pub tokens_remaining: i64,
    pub token_limit_per_day: Option<i64>,
}

impl NewApiKey {
    pub fn new(owner_user_id: i64, api_key: impl Into<String>, free_tokens: i64) -> Self {
        Self {
            owner_user_id,
            api_key: api_key.into(),
            label: None,
            instructions: None,
            total_tokens: free_tokens,
            tokens_remaining: free_tokens,
            token_limit_per_day: None,
        }
    }

    pub fn with_daily_limit(mut self, limit: i64) -> Self {
        self.token_limit_per_day = Some(limit);
        self.total_tokens = limit;
        self.tokens_remaining = limit;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }
}

/// Request body for creating a new API key.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner_user_id": 1,
///   "api_key": "sk-0f3c...",
///   "label": "Production",
///   "instructions": "Summarize in English",
///   "token_limit": 5000
/// }
/// ```
///
/// # Validation
///
/// - `owner_user_id`: Required, must reference an existing user
/// - `api_key`: Optional over HTTP (generated when omitted), 1 to 64 characters
/// - `token_limit`: Optional, falls back to the free-tier budget when omitted or zero
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateApiKeyRequest {
    pub owner_user_id: i64,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub instructions: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub token_limit: Option<i64>,
}
