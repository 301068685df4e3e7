//! API key HTTP handlers.
//!
//! This module implements the API key endpoints:
//! - POST /api/v1/api-keys - Create a new API key
//! - GET /api/v1/api-keys/{key} - Look up a key
//! - GET /api/v1/users/{user_id}/api-keys - List a user's keys

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    models::api_key::{ApiKeyRecord, CreateApiKeyRequest},
    services::api_key_service,
};

/// Prefix on generated keys.
const GENERATED_KEY_PREFIX: &str = "sk-";

/// Create a new API key.
///
/// # Request Body
///
/// ```json
/// {
///   "owner_user_id": 1,
///   "label": "Production",
///   "token_limit": 5000
/// }
/// ```
///
/// When `api_key` is omitted a random one is generated.
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created record
/// - **Error (400)**: Key length or token limit invalid
/// - **Error (409)**: Key already exists
/// - **Error (422)**: Owner user does not exist
pub async fn create_api_key(
    State(state): State<AppState>,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let api_key = request.api_key.unwrap_or_else(generate_api_key);

    let record = api_key_service::create_entry(
        &state.pool,
        &state.token_policy,
        request.owner_user_id,
        &api_key,
        request.instructions,
        request.label,
        request.token_limit,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Look up a record by its key.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the record
/// - **Error (404)**: No record has this key
pub async fn get_api_key(
    State(state): State<AppState>,
    Path(api_key): Path<String>,
) -> Result<Json<ApiKeyRecord>, AppError> {
    let record = api_key_service::lookup_by_key(&state.pool, &api_key)
        .await?
        .ok_or(AppError::ApiKeyNotFound)?;

    Ok(Json(record))
}

/// List every key owned by a user, newest first. May be empty.
pub async fn list_user_api_keys(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ApiKeyRecord>>, AppError> {
    let records = api_key_service::list_for_owner(&state.pool, user_id).await?;
    Ok(Json(records))
}

/// Generate a random API key.
///
/// # Output
///
/// `sk-` followed by 48 hex characters (24 random bytes)
fn generate_api_key() -> String {
    let bytes: [u8; 24] = rand::random();
    format!("{GENERATED_KEY_PREFIX}{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api_key::MAX_API_KEY_LEN;

    #[test]
    fn generated_keys_fit_the_column() {
        let key = generate_api_key();
        assert!(key.starts_with(GENERATED_KEY_PREFIX));
        assert_eq!(key.len(), GENERATED_KEY_PREFIX.len() + 48);
        assert!(key.len() <= MAX_API_KEY_LEN);
        assert_ne!(key, generate_api_key());
    }
}
