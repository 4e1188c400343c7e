//! Press release entity model and DTOs.

use pressroom_core::release::ReleaseStatus;
use pressroom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Release {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub uuid: Uuid,
    pub user_id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ReleaseStatus,
    /// Comma-joined product-type tags, e.g. `"pr,yahoo"`.
    pub distribution: String,
    pub banner_id: Option<DbId>,
    pub primary_image_id: Option<DbId>,
    pub release_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a release.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelease {
    pub company_id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub release_at: Option<Timestamp>,
}

/// Wizard edits. All fields are optional; `status` is a wizard step target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRelease {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub banner_id: Option<DbId>,
    pub primary_image_id: Option<DbId>,
    pub release_at: Option<Timestamp>,
    pub status: Option<ReleaseStatus>,
}

/// Filter for release listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseFilter {
    pub company_id: Option<DbId>,
    pub status: Option<ReleaseStatus>,
}
