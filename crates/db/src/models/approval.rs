//! Stakeholder approval models.

use pressroom_core::approval::{sign_off_state, SignOffState};
use pressroom_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `release_approvals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReleaseApproval {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub uuid: Uuid,
    #[serde(skip_serializing)]
    pub release_id: DbId,
    pub email: String,
    pub email_to: String,
    pub signed_at: Option<Timestamp>,
    pub approved: Option<bool>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

impl ReleaseApproval {
    pub fn state(&self) -> SignOffState {
        sign_off_state(self.signed_at, self.approved)
    }
}

/// DTO for inserting an approval request.
#[derive(Debug, Clone)]
pub struct CreateApproval {
    pub release_id: DbId,
    pub email: String,
    pub email_to: String,
}
