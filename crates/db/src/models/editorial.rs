//! Editorial queue models.

use pressroom_core::release::ReleaseStatus;
use pressroom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `editorial_queue` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueEntry {
    pub id: DbId,
    pub release_id: DbId,
    pub editor_id: Option<DbId>,
    pub editor_name: Option<String>,
    pub submitted: bool,
    pub checked_out_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A queue row joined with the release it refers to, for the worklist.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueItem {
    pub release_uuid: Uuid,
    pub title: String,
    pub company_id: DbId,
    pub company_name: String,
    #[sqlx(try_from = "String")]
    pub status: ReleaseStatus,
    pub distribution: String,
    pub editor_id: Option<DbId>,
    pub editor_name: Option<String>,
    pub submitted: bool,
    pub queued_at: Timestamp,
}
