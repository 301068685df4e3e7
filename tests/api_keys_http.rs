use api_key_registry::{
    AppState, db, router, services::api_key_service::TokenPolicy,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const FREE_TOKENS: i64 = 1000;

async fn test_app() -> Router {
    let pool = db::create_memory_pool().await.unwrap();
    sqlx::query("INSERT INTO users (id, email) VALUES (1, 'owner@example.com')")
        .execute(&pool)
        .await
        .unwrap();

    router(AppState {
        pool,
        token_policy: TokenPolicy::new(FREE_TOKENS),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_database_connected() {
    let app = test_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn create_then_lookup() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        post_json(
            "/api/v1/api-keys",
            json!({
                "owner_user_id": 1,
                "api_key": "abc123",
                "label": "primary",
                "instructions": "Be brief",
                "token_limit": 5000
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["total_tokens"], 5000);
    assert_eq!(created["tokens_remaining"], 5000);
    assert_eq!(created["tokens_used"], 0);

    let (status, found) = send(&app, get("/api/v1/api-keys/abc123")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], created["id"]);
    assert_eq!(found["owner_user_id"], 1);
    assert_eq!(found["label"], "primary");
    assert_eq!(found["instructions"], "Be brief");
}

#[tokio::test]
async fn omitted_key_is_generated_with_free_tier_budget() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        post_json("/api/v1/api-keys", json!({ "owner_user_id": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["api_key"].as_str().unwrap().starts_with("sk-"));
    assert_eq!(created["total_tokens"], FREE_TOKENS);
    assert_eq!(created["tokens_remaining"], FREE_TOKENS);
}

#[tokio::test]
async fn duplicate_key_conflicts() {
    let app = test_app().await;
    let body = json!({ "owner_user_id": 1, "api_key": "abc123" });

    let (status, _) = send(&app, post_json("/api/v1/api-keys", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&app, post_json("/api/v1/api-keys", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], "api_key_exists");
}

#[tokio::test]
async fn unknown_owner_is_rejected() {
    let app = test_app().await;

    let (status, error) = send(
        &app,
        post_json(
            "/api/v1/api-keys",
            json!({ "owner_user_id": 99, "api_key": "abc123" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"]["code"], "owner_not_found");
}

#[tokio::test]
async fn negative_limit_is_bad_request() {
    let app = test_app().await;

    let (status, error) = send(
        &app,
        post_json(
            "/api/v1/api-keys",
            json!({ "owner_user_id": 1, "api_key": "abc123", "token_limit": -5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "invalid_request");
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let app = test_app().await;
    let (status, error) = send(&app, get("/api/v1/api-keys/nonexistent")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "api_key_not_found");
}

#[tokio::test]
async fn lists_keys_for_user() {
    let app = test_app().await;
    for key in ["first", "second"] {
        send(
            &app,
            post_json(
                "/api/v1/api-keys",
                json!({ "owner_user_id": 1, "api_key": key }),
            ),
        )
        .await;
    }

    let (status, body) = send(&app, get("/api/v1/users/1/api-keys")).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["api_key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["second", "first"]);

    let (status, body) = send(&app, get("/api/v1/users/2/api-keys")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
