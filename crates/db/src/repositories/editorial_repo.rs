//! Repository for the `editorial_queue` table.
//!
//! The `editor_id` column is an advisory checkout marker. Writes to it are
//! plain overwrites; the decision guard lives in `pressroom_core::editorial`.

use pressroom_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::editorial::{QueueEntry, QueueItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, release_id, editor_id, editor_name, submitted, checked_out_at, \
    created_at, updated_at";

/// Provides queue membership and checkout operations.
pub struct EditorialRepo;

impl EditorialRepo {
    /// Put a release in the queue, or mark its existing row as resubmitted.
    ///
    /// A resubmission keeps any current checkout.
    pub async fn enqueue(
        conn: &mut PgConnection,
        release_id: DbId,
    ) -> Result<QueueEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO editorial_queue (release_id, submitted)
             VALUES ($1, true)
             ON CONFLICT ON CONSTRAINT uq_editorial_queue_release
             DO UPDATE SET submitted = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(release_id)
            .fetch_one(conn)
            .await
    }

    /// Find the queue row for a release.
    pub async fn find_by_release<'e, E>(
        executor: E,
        release_id: DbId,
    ) -> Result<Option<QueueEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM editorial_queue WHERE release_id = $1");
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(release_id)
            .fetch_optional(executor)
            .await
    }

    /// Set the checkout holder, overwriting whoever held it before.
    ///
    /// Returns `None` if the release has no queue row.
    pub async fn checkout(
        pool: &PgPool,
        release_id: DbId,
        editor_id: DbId,
        editor_name: &str,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE editorial_queue
             SET editor_id = $2, editor_name = $3, checked_out_at = NOW()
             WHERE release_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(release_id)
            .bind(editor_id)
            .bind(editor_name)
            .fetch_optional(pool)
            .await
    }

    /// Clear the checkout holder. Returns `None` if the release has no queue row.
    pub async fn clear_checkout(
        pool: &PgPool,
        release_id: DbId,
    ) -> Result<Option<QueueEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE editorial_queue
             SET editor_id = NULL, editor_name = NULL, checked_out_at = NULL
             WHERE release_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueEntry>(&query)
            .bind(release_id)
            .fetch_optional(pool)
            .await
    }

    /// Drop the queue row once a release leaves review. Returns `true` if a row was removed.
    pub async fn remove(conn: &mut PgConnection, release_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM editorial_queue WHERE release_id = $1")
            .bind(release_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The review worklist, oldest submission first.
    pub async fn list_queue(pool: &PgPool) -> Result<Vec<QueueItem>, sqlx::Error> {
        sqlx::query_as::<_, QueueItem>(
            "SELECT
                r.uuid AS release_uuid,
                r.title,
                r.company_id,
                c.name AS company_name,
                r.status,
                r.distribution,
                q.editor_id,
                q.editor_name,
                q.submitted,
                q.created_at AS queued_at
             FROM editorial_queue q
             JOIN releases r ON r.id = q.release_id
             JOIN companies c ON c.id = r.company_id
             WHERE r.deleted_at IS NULL
             ORDER BY q.created_at ASC",
        )
        .fetch_all(pool)
        .await
    }
}
