mod common;

use assert_matches::assert_matches;
use common::seed_user;
use pressroom_db::models::user::CreateUser;
use pressroom_db::repositories::UserRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn emails_differing_only_in_case_collide(pool: PgPool) {
    let ada = seed_user(&pool, "Ada@example.com", "user").await;

    let result = UserRepo::create(
        &pool,
        &CreateUser {
            email: "ada@EXAMPLE.com".to_string(),
            name: "impostor".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: None,
        },
    )
    .await;

    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_users_email")
    );

    let found = UserRepo::find_by_email(&pool, "ADA@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, ada.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn role_defaults_to_user(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "grace@example.com".to_string(),
            name: "grace".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(user.role, "user");
    assert!(user.is_active);
}
