//! Repository for the `release_approvals` table.

use pressroom_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::approval::{CreateApproval, ReleaseApproval};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, uuid, release_id, email, email_to, signed_at, approved, comment, created_at";

/// Provides stakeholder sign-off operations.
pub struct ApprovalRepo;

impl ApprovalRepo {
    /// Insert a sign-off request under a fresh random UUID.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApproval,
    ) -> Result<ReleaseApproval, sqlx::Error> {
        let query = format!(
            "INSERT INTO release_approvals (uuid, release_id, email, email_to)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReleaseApproval>(&query)
            .bind(Uuid::new_v4())
            .bind(input.release_id)
            .bind(&input.email)
            .bind(&input.email_to)
            .fetch_one(pool)
            .await
    }

    /// Find a sign-off by its public UUID.
    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: Uuid,
    ) -> Result<Option<ReleaseApproval>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM release_approvals WHERE uuid = $1");
        sqlx::query_as::<_, ReleaseApproval>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List sign-offs for a release, newest first.
    pub async fn list_for_release(
        pool: &PgPool,
        release_id: DbId,
    ) -> Result<Vec<ReleaseApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM release_approvals
             WHERE release_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ReleaseApproval>(&query)
            .bind(release_id)
            .fetch_all(pool)
            .await
    }

    /// Record the stakeholder's decision.
    ///
    /// Returns `None` if the row does not exist or was already signed.
    pub async fn sign(
        pool: &PgPool,
        id: DbId,
        approved: bool,
        comment: Option<&str>,
    ) -> Result<Option<ReleaseApproval>, sqlx::Error> {
        let query = format!(
            "UPDATE release_approvals
             SET signed_at = NOW(), approved = $2, comment = $3
             WHERE id = $1 AND signed_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReleaseApproval>(&query)
            .bind(id)
            .bind(approved)
            .bind(comment)
            .fetch_optional(pool)
            .await
    }
}
