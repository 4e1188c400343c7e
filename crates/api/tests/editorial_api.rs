//! HTTP tests for the editorial worklist: role gating, advisory checkout
//! and editor decisions.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    build_test_app, create_release, expect_data, get, grant, post, seed_company, seed_user,
};
use pressroom_core::credits::ProductType;
use serde_json::Value;
use sqlx::PgPool;

/// Seed an author with one submitted release and return the app and the
/// release uuid.
async fn submitted_release(pool: &PgPool) -> (Router, String) {
    let (author, token) = seed_user(pool, "author@example.com", "user").await;
    let acme = seed_company(pool, author.id, "Acme").await;
    grant(pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let app = build_test_app(pool.clone());

    let release = create_release(&app, &token, acme.id, "Launch").await;
    let uuid = release["uuid"].as_str().unwrap().to_string();
    let submitted = post(&app, &format!("/api/v1/releases/{uuid}/submit"), Some(&token)).await;
    assert_eq!(submitted.status(), StatusCode::OK);
    (app, uuid)
}

async fn queue(app: &Router, token: &str) -> Vec<Value> {
    let response = get(app, "/api/v1/editorial/queue", Some(token)).await;
    let data = expect_data(response, StatusCode::OK).await;
    data.as_array().unwrap().clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn plain_users_cannot_reach_the_queue(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (_, user) = seed_user(&pool, "reader@example.com", "user").await;

    let listed = get(&app, "/api/v1/editorial/queue", Some(&user)).await;
    assert_eq!(listed.status(), StatusCode::FORBIDDEN);

    let approve = post(&app, &format!("/api/v1/editorial/queue/{uuid}/approve"), Some(&user)).await;
    assert_eq!(approve.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submitted_release_appears_in_queue(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (_, editor) = seed_user(&pool, "ed@example.com", "editor").await;

    let items = queue(&app, &editor).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["release_uuid"], uuid.as_str());
    assert_eq!(items[0]["status"], "editorial");
    assert_eq!(items[0]["company_name"], "Acme");
    assert!(items[0]["editor_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_checkout_takes_over_and_blocks_first_editor(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (first, first_token) = seed_user(&pool, "ed1@example.com", "editor").await;
    let (second, second_token) = seed_user(&pool, "ed2@example.com", "editor").await;
    let checkout_uri = format!("/api/v1/editorial/queue/{uuid}/checkout");

    let taken = post(&app, &checkout_uri, Some(&first_token)).await;
    let taken = expect_data(taken, StatusCode::OK).await;
    assert_eq!(taken["editor_id"], first.id);
    assert_eq!(taken["took_over"], false);

    let stolen = post(&app, &checkout_uri, Some(&second_token)).await;
    let stolen = expect_data(stolen, StatusCode::OK).await;
    assert_eq!(stolen["editor_id"], second.id);
    assert_eq!(stolen["previous_editor_id"], first.id);
    assert_eq!(stolen["took_over"], true);
    assert_eq!(stolen["entry"]["editor_name"], "ed2");

    let blocked = post(
        &app,
        &format!("/api/v1/editorial/queue/{uuid}/approve"),
        Some(&first_token),
    )
    .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    let approved = post(
        &app,
        &format!("/api/v1/editorial/queue/{uuid}/approve"),
        Some(&second_token),
    )
    .await;
    let approved = expect_data(approved, StatusCode::OK).await;
    assert_eq!(approved["status"], "approved");
    assert!(queue(&app, &second_token).await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn hold_keeps_queue_row_and_reject_removes_it(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (_, editor) = seed_user(&pool, "ed@example.com", "editor").await;

    let held = post(&app, &format!("/api/v1/editorial/queue/{uuid}/hold"), Some(&editor)).await;
    let held = expect_data(held, StatusCode::OK).await;
    assert_eq!(held["status"], "hold");

    let items = queue(&app, &editor).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "hold");

    let rejected =
        post(&app, &format!("/api/v1/editorial/queue/{uuid}/reject"), Some(&editor)).await;
    let rejected = expect_data(rejected, StatusCode::OK).await;
    assert_eq!(rejected["status"], "draftnxt");
    assert!(queue(&app, &editor).await.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn publish_requires_approval(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (_, editor) = seed_user(&pool, "ed@example.com", "editor").await;
    let publish_uri = format!("/api/v1/editorial/releases/{uuid}/publish");

    let early = post(&app, &publish_uri, Some(&editor)).await;
    assert_eq!(early.status(), StatusCode::CONFLICT);

    post(&app, &format!("/api/v1/editorial/queue/{uuid}/approve"), Some(&editor)).await;
    let sent = post(&app, &publish_uri, Some(&editor)).await;
    let sent = expect_data(sent, StatusCode::OK).await;
    assert_eq!(sent["status"], "sent");

    let twice = post(&app, &publish_uri, Some(&editor)).await;
    assert_eq!(twice.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_holder_or_admin_can_drop_a_checkout(pool: PgPool) {
    let (app, uuid) = submitted_release(&pool).await;
    let (_, holder) = seed_user(&pool, "ed1@example.com", "editor").await;
    let (_, other) = seed_user(&pool, "ed2@example.com", "editor").await;
    let (_, admin) = seed_user(&pool, "boss@example.com", "admin").await;
    let release_uri = format!("/api/v1/editorial/queue/{uuid}/release");

    let nothing_held = post(&app, &release_uri, Some(&holder)).await;
    assert_eq!(nothing_held.status(), StatusCode::CONFLICT);

    post(&app, &format!("/api/v1/editorial/queue/{uuid}/checkout"), Some(&holder)).await;

    let refused = post(&app, &release_uri, Some(&other)).await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let dropped = post(&app, &release_uri, Some(&admin)).await;
    let dropped = expect_data(dropped, StatusCode::OK).await;
    assert!(dropped["editor_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_of_unqueued_release_is_not_found(pool: PgPool) {
    let (author, token) = seed_user(&pool, "author@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    grant(&pool, author.id, Some(acme.id), 1, ProductType::Pr).await;
    let (_, editor) = seed_user(&pool, "ed@example.com", "editor").await;
    let app = build_test_app(pool);

    let release = create_release(&app, &token, acme.id, "Draft only").await;
    let uuid = release["uuid"].as_str().unwrap();

    let response = post(
        &app,
        &format!("/api/v1/editorial/queue/{uuid}/checkout"),
        Some(&editor),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
