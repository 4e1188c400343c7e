//! HTTP tests for stakeholder sign-off requests and the public sign link.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_bus, create_release, expect_data, get, grant,
    post_json, seed_company, seed_user,
};
use pressroom_core::credits::ProductType;
use pressroom_events::event_types;
use serde_json::json;
use sqlx::PgPool;
use tokio::sync::broadcast::error::TryRecvError;

#[sqlx::test(migrations = "../db/migrations")]
async fn request_records_approval_and_publishes_event(pool: PgPool) {
    let (author, token) = seed_user(&pool, "ada@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    grant(&pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let (app, bus) = build_test_app_with_bus(pool);

    let release = create_release(&app, &token, acme.id, "Launch").await;
    let uuid = release["uuid"].as_str().unwrap();
    let mut rx = bus.subscribe();

    let response = post_json(
        &app,
        &format!("/api/v1/releases/{uuid}/approvals"),
        Some(&token),
        json!({ "email": "ada@example.com", "email_to": "cfo@acme.test" }),
    )
    .await;
    let approval = expect_data(response, StatusCode::CREATED).await;
    assert_eq!(approval["email_to"], "cfo@acme.test");
    assert!(approval["signed_at"].is_null());
    assert!(approval.get("release_id").is_none());

    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, event_types::APPROVAL_REQUESTED);
    assert_eq!(event.payload["approval_uuid"], approval["uuid"]);
    assert_eq!(event.payload["email_to"], "cfo@acme.test");
    assert_eq!(event.payload["release_title"], "Launch");
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));

    let listed = get(&app, &format!("/api/v1/releases/{uuid}/approvals"), Some(&token)).await;
    let listed = expect_data(listed, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_stakeholder_email_is_rejected(pool: PgPool) {
    let (author, token) = seed_user(&pool, "ada@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    grant(&pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let app = build_test_app(pool);

    let release = create_release(&app, &token, acme.id, "Launch").await;
    let uuid = release["uuid"].as_str().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/releases/{uuid}/approvals"),
        Some(&token),
        json!({ "email": "ada@example.com", "email_to": "not-an-address" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stakeholder_signs_once_without_an_account(pool: PgPool) {
    let (author, token) = seed_user(&pool, "ada@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    grant(&pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let app = build_test_app(pool);

    let release = create_release(&app, &token, acme.id, "Launch").await;
    let uuid = release["uuid"].as_str().unwrap();
    let approval = post_json(
        &app,
        &format!("/api/v1/releases/{uuid}/approvals"),
        Some(&token),
        json!({ "email": "ada@example.com", "email_to": "cfo@acme.test" }),
    )
    .await;
    let approval = expect_data(approval, StatusCode::CREATED).await;
    let link = format!("/api/v1/approvals/{}", approval["uuid"].as_str().unwrap());

    let view = expect_data(get(&app, &link, None).await, StatusCode::OK).await;
    assert_eq!(view["release_title"], "Launch");
    assert_eq!(view["state"], "pending");

    let signed = post_json(
        &app,
        &format!("{link}/sign"),
        None,
        json!({ "approved": true, "comment": "  Looks good  " }),
    )
    .await;
    let signed = expect_data(signed, StatusCode::OK).await;
    assert_eq!(signed["approved"], true);
    assert_eq!(signed["comment"], "Looks good");
    assert!(!signed["signed_at"].is_null());

    let again = post_json(&app, &format!("{link}/sign"), None, json!({ "approved": false })).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let view = expect_data(get(&app, &link, None).await, StatusCode::OK).await;
    assert_eq!(view["state"], "approved");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_sign_link_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let link = format!("/api/v1/approvals/{}", uuid::Uuid::new_v4());

    assert_eq!(get(&app, &link, None).await.status(), StatusCode::NOT_FOUND);
    let sign = post_json(&app, &format!("{link}/sign"), None, json!({ "approved": true })).await;
    assert_eq!(sign.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_author_may_request_sign_off(pool: PgPool) {
    let (author, token) = seed_user(&pool, "ada@example.com", "user").await;
    let (_, editor) = seed_user(&pool, "ed@example.com", "editor").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    grant(&pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let app = build_test_app(pool);

    let release = create_release(&app, &token, acme.id, "Launch").await;
    let uuid = release["uuid"].as_str().unwrap();

    // Staff can read the release but cannot act for its author.
    let response = post_json(
        &app,
        &format!("/api/v1/releases/{uuid}/approvals"),
        Some(&editor),
        json!({ "email": "ed@example.com", "email_to": "cfo@acme.test" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
