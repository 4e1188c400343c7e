//! Repository for the `releases` table.

use pressroom_core::distribution;
use pressroom_core::release::{ReleaseStatus, INITIAL_STATUS};
use pressroom_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::release::{CreateRelease, Release, ReleaseFilter, UpdateRelease};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, uuid, user_id, company_id, title, summary, body, status, \
    distribution, banner_id, primary_image_id, release_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for releases.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a new release in the initial status with `pr` distribution.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &CreateRelease,
    ) -> Result<Release, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases
                (uuid, user_id, company_id, title, summary, body, status, distribution, release_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(input.company_id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(INITIAL_STATUS.as_str())
            .bind(distribution::initial())
            .bind(input.release_at)
            .fetch_one(conn)
            .await
    }

    /// Find a live release by its public UUID.
    pub async fn find_by_uuid<'e, E>(
        executor: E,
        uuid: Uuid,
    ) -> Result<Option<Release>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {COLUMNS} FROM releases WHERE uuid = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Release>(&query)
            .bind(uuid)
            .fetch_optional(executor)
            .await
    }

    /// Find a live release by UUID and lock its row for the rest of the transaction.
    pub async fn find_by_uuid_for_update(
        conn: &mut PgConnection,
        uuid: Uuid,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases WHERE uuid = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(uuid)
            .fetch_optional(conn)
            .await
    }

    /// Find a release by internal ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's live releases, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &ReleaseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases
             WHERE user_id = $1
               AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR company_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(user_id)
            .bind(filter.company_id)
            .bind(filter.status.map(ReleaseStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply wizard edits. Only non-`None` fields are written.
    ///
    /// `status` is the already-validated wizard target, if any.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateRelease,
        status: Option<ReleaseStatus>,
    ) -> Result<Release, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                body = COALESCE($4, body),
                banner_id = COALESCE($5, banner_id),
                primary_image_id = COALESCE($6, primary_image_id),
                release_at = COALESCE($7, release_at),
                status = COALESCE($8, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(input.banner_id)
            .bind(input.primary_image_id)
            .bind(input.release_at)
            .bind(status.map(ReleaseStatus::as_str))
            .fetch_one(conn)
            .await
    }

    /// Write a new status, returning the updated row.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: ReleaseStatus,
    ) -> Result<Release, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET status = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Replace the comma-joined distribution tags.
    pub async fn set_distribution(
        conn: &mut PgConnection,
        id: DbId,
        distribution: &str,
    ) -> Result<Release, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET distribution = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(distribution)
            .fetch_one(conn)
            .await
    }

    /// Soft-delete a release by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE releases SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
