//! Shared harness for the HTTP integration tests.
//!
//! Requests go through [`build_app_router`] so every test exercises the same
//! middleware stack production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use pressroom_api::auth::jwt::{generate_access_token, JwtConfig};
use pressroom_api::auth::password::hash_password;
use pressroom_api::config::ServerConfig;
use pressroom_api::router::build_app_router;
use pressroom_api::state::AppState;
use pressroom_core::credits::ProductType;
use pressroom_core::types::DbId;
use pressroom_db::models::company::{Company, CreateCompany};
use pressroom_db::models::credit::NewCreditEntry;
use pressroom_db::models::user::{CreateUser, User};
use pressroom_db::repositories::{CompanyRepo, CreditRepo, UserRepo};
use pressroom_events::EventBus;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        app_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router against `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool).0
}

/// Like [`build_test_app`], also returning the event bus so tests can
/// subscribe before issuing requests.
pub fn build_test_app_with_bus(pool: PgPool) -> (Router, Arc<EventBus>) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    (build_app_router(state, &config), event_bus)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::POST, uri, token, None).await
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the `data` field of the envelope.
pub async fn expect_data(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    let mut json = body_json(response).await;
    json["data"].take()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return it with a valid token.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: Some(role.to_string()),
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, &user.role, &test_config().jwt).unwrap();
    (user, token)
}

pub async fn seed_company(pool: &PgPool, user_id: DbId, name: &str) -> Company {
    CompanyRepo::create(
        pool,
        user_id,
        &CreateCompany {
            name: name.to_string(),
            website: None,
        },
    )
    .await
    .unwrap()
}

pub async fn grant(
    pool: &PgPool,
    user_id: DbId,
    company_id: Option<DbId>,
    credits: i32,
    product_type: ProductType,
) {
    CreditRepo::append(
        pool,
        &NewCreditEntry {
            user_id,
            company_id,
            release_id: None,
            credits,
            product_type,
            notes: Some("test grant".to_string()),
        },
    )
    .await
    .unwrap();
}

/// Create a release through the API and return its `data` object.
pub async fn create_release(app: &Router, token: &str, company_id: DbId, title: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/releases",
        Some(token),
        serde_json::json!({ "company_id": company_id, "title": title }),
    )
    .await;
    expect_data(response, StatusCode::CREATED).await
}

/// Count ledger rows tied to a release by its uuid.
pub async fn ledger_rows_for_release(pool: &PgPool, uuid: &str) -> Vec<(i32, String)> {
    sqlx::query_as(
        "SELECT l.credits, l.product_type FROM credit_ledger l
         JOIN releases r ON r.id = l.release_id
         WHERE r.uuid = $1::UUID
         ORDER BY l.id",
    )
    .bind(uuid)
    .fetch_all(pool)
    .await
    .unwrap()
}
