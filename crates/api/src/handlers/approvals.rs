//! Handlers for stakeholder sign-offs.
//!
//! Authors request and list sign-offs under `/releases/{uuid}/approvals`.
//! Stakeholders have no account: they open and sign `/approvals/{uuid}`,
//! where the random approval UUID is the only credential.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pressroom_core::approval::{
    ensure_unsigned, validate_input, SignOffDecision, SignOffRequest, SignOffState,
};
use pressroom_core::error::CoreError;
use pressroom_core::types::Timestamp;
use pressroom_db::models::approval::{CreateApproval, ReleaseApproval};
use pressroom_db::repositories::{ApprovalRepo, ReleaseRepo, UserRepo};
use pressroom_events::{event_types, DomainEvent};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::releases::find_accessible;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// What a stakeholder sees when opening a sign link.
#[derive(Debug, Serialize)]
pub struct ApprovalView {
    pub uuid: Uuid,
    pub release_title: String,
    pub release_summary: Option<String>,
    pub requested_by: String,
    pub state: SignOffState,
    pub signed_at: Option<Timestamp>,
    pub comment: Option<String>,
}

fn approval_not_found(uuid: Uuid) -> AppError {
    AppError::Core(CoreError::not_found("Approval", uuid))
}

/// GET /api/v1/releases/{uuid}/approvals
pub async fn list_for_release(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Vec<ReleaseApproval>>>> {
    let release = find_accessible(&state, &auth, uuid).await?;
    let approvals = ApprovalRepo::list_for_release(&state.pool, release.id).await?;
    Ok(Json(DataResponse { data: approvals }))
}

/// POST /api/v1/releases/{uuid}/approvals
///
/// Records the request and publishes `approval.requested`; the notifier
/// emails the stakeholder their sign link.
pub async fn request(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
    AppJson(input): AppJson<SignOffRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ReleaseApproval>>)> {
    validate_input(&input)?;
    let release = find_accessible(&state, &auth, uuid).await?;
    if !auth.can_modify(release.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the release author can request approvals".into(),
        )));
    }

    let approval = ApprovalRepo::create(
        &state.pool,
        &CreateApproval {
            release_id: release.id,
            email: input.email.trim().to_string(),
            email_to: input.email_to.trim().to_string(),
        },
    )
    .await?;

    let requested_by = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|user| user.name)
        .unwrap_or_else(|| approval.email.clone());

    tracing::info!(
        user_id = auth.user_id,
        release_id = release.id,
        approval_id = approval.id,
        "Approval requested"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::APPROVAL_REQUESTED)
            .with_source("release", release.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "approval_uuid": approval.uuid,
                "email_to": approval.email_to,
                "release_title": release.title,
                "requested_by": requested_by,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: approval })))
}

/// GET /api/v1/approvals/{uuid} (public)
pub async fn get_public(
    State(state): State<AppState>,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<ApprovalView>>> {
    let approval = ApprovalRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .ok_or_else(|| approval_not_found(uuid))?;
    let release = ReleaseRepo::find_by_id_include_deleted(&state.pool, approval.release_id)
        .await?
        .ok_or_else(|| approval_not_found(uuid))?;

    Ok(Json(DataResponse {
        data: ApprovalView {
            uuid: approval.uuid,
            state: approval.state(),
            release_title: release.title,
            release_summary: release.summary,
            requested_by: approval.email,
            signed_at: approval.signed_at,
            comment: approval.comment,
        },
    }))
}

/// POST /api/v1/approvals/{uuid}/sign (public)
///
/// Records the stakeholder's decision. A sign-off can be answered once;
/// later attempts get 409.
pub async fn sign(
    State(state): State<AppState>,
    AppPath(uuid): AppPath<Uuid>,
    AppJson(input): AppJson<SignOffDecision>,
) -> AppResult<Json<DataResponse<ReleaseApproval>>> {
    validate_input(&input)?;
    let approval = ApprovalRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .ok_or_else(|| approval_not_found(uuid))?;
    ensure_unsigned(approval.signed_at)?;

    let comment = input
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    // The conditional update loses to a concurrent signer instead of
    // overwriting their answer.
    let signed = ApprovalRepo::sign(&state.pool, approval.id, input.approved, comment)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This approval has already been signed".into(),
            ))
        })?;

    tracing::info!(
        approval_id = signed.id,
        release_id = signed.release_id,
        approved = input.approved,
        "Approval signed"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::APPROVAL_SIGNED)
            .with_source("release", signed.release_id)
            .with_payload(serde_json::json!({
                "approval_uuid": signed.uuid,
                "approved": input.approved,
            })),
    );

    Ok(Json(DataResponse { data: signed }))
}
