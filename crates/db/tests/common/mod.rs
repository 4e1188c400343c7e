//! Seed helpers shared by the repository integration tests.

#![allow(dead_code)]

use pressroom_core::credits::ProductType;
use pressroom_core::types::DbId;
use pressroom_db::models::company::{Company, CreateCompany};
use pressroom_db::models::credit::{CreditEntry, NewCreditEntry};
use pressroom_db::models::release::{CreateRelease, Release};
use pressroom_db::models::user::{CreateUser, User};
use pressroom_db::repositories::{CompanyRepo, CreditRepo, ReleaseRepo, UserRepo};
use sqlx::PgPool;

pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("user insert should succeed")
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
    .expect("company insert should succeed")
}

pub async fn seed_release(pool: &PgPool, user_id: DbId, company_id: DbId, title: &str) -> Release {
    let mut conn = pool.acquire().await.unwrap();
    ReleaseRepo::create(
        &mut *conn,
        user_id,
        &CreateRelease {
            company_id,
            title: title.to_string(),
            summary: None,
            body: None,
            release_at: None,
        },
    )
    .await
    .expect("release insert should succeed")
}

pub async fn seed_credits(
    pool: &PgPool,
    user_id: DbId,
    company_id: Option<DbId>,
    credits: i32,
    product_type: ProductType,
) -> CreditEntry {
    CreditRepo::append(
        pool,
        &NewCreditEntry {
            user_id,
            company_id,
            release_id: None,
            credits,
            product_type,
            notes: Some("seed".to_string()),
        },
    )
    .await
    .expect("ledger insert should succeed")
}
