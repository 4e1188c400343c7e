//! Handlers for the `/editorial` resource (staff review worklist).
//!
//! Checkout is advisory: a second editor's checkout overwrites the first and
//! the response names whoever held it before. Decisions are refused while
//! another editor holds the row.

use axum::extract::State;
use axum::Json;
use pressroom_core::editorial::{self, CheckoutOutcome};
use pressroom_core::error::CoreError;
use pressroom_core::release::Transition;
use pressroom_db::models::editorial::{QueueEntry, QueueItem};
use pressroom_db::models::release::Release;
use pressroom_db::repositories::{EditorialRepo, ReleaseRepo, UserRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::AppPath;
use crate::handlers::releases::{status_changed_event, transition_release};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /editorial/queue/{uuid}/checkout`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub entry: QueueEntry,
    #[serde(flatten)]
    pub outcome: CheckoutOutcome,
    pub took_over: bool,
}

/// Resolve a release UUID to its queue row.
async fn find_queue_entry(state: &AppState, uuid: Uuid) -> AppResult<(Release, QueueEntry)> {
    let release = ReleaseRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Release", uuid)))?;
    let entry = EditorialRepo::find_by_release(&state.pool, release.id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("EditorialQueueEntry", uuid)))?;
    Ok((release, entry))
}

/// GET /api/v1/editorial/queue
pub async fn queue(
    State(state): State<AppState>,
    RequireEditor(_editor): RequireEditor,
) -> AppResult<Json<DataResponse<Vec<QueueItem>>>> {
    let items = EditorialRepo::list_queue(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/editorial/queue/{uuid}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    let (release, entry) = find_queue_entry(&state, uuid).await?;
    let editor_name = UserRepo::find_by_id(&state.pool, editor.user_id)
        .await?
        .map(|user| user.name)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let outcome = editorial::checkout(entry.editor_id, editor.user_id);
    let entry = EditorialRepo::checkout(&state.pool, release.id, editor.user_id, &editor_name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("EditorialQueueEntry", uuid)))?;

    if let Some(previous) = outcome.previous_editor_id {
        tracing::warn!(
            release_id = release.id,
            editor_id = editor.user_id,
            previous_editor_id = previous,
            "Editorial checkout taken over"
        );
    } else {
        tracing::info!(release_id = release.id, editor_id = editor.user_id, "Release checked out");
    }

    let took_over = outcome.took_over();
    Ok(Json(DataResponse {
        data: CheckoutResponse {
            entry,
            outcome,
            took_over,
        },
    }))
}

/// POST /api/v1/editorial/queue/{uuid}/release
///
/// Drops the checkout. Only the holder or an admin may do this.
pub async fn release_checkout(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<QueueEntry>>> {
    let (release, entry) = find_queue_entry(&state, uuid).await?;
    editorial::ensure_can_release(entry.editor_id, editor.user_id, editor.is_admin())?;

    let entry = EditorialRepo::clear_checkout(&state.pool, release.id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("EditorialQueueEntry", uuid)))?;
    tracing::info!(release_id = release.id, editor_id = editor.user_id, "Checkout released");

    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/editorial/queue/{uuid}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    decide(&state, &editor, uuid, Transition::Approve).await
}

/// POST /api/v1/editorial/queue/{uuid}/hold
pub async fn hold(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    decide(&state, &editor, uuid, Transition::Hold).await
}

/// POST /api/v1/editorial/queue/{uuid}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    decide(&state, &editor, uuid, Transition::Reject).await
}

/// POST /api/v1/editorial/releases/{uuid}/publish
///
/// Marks an approved release as sent once distribution has gone out.
pub async fn publish(
    State(state): State<AppState>,
    RequireEditor(editor): RequireEditor,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    decide(&state, &editor, uuid, Transition::Publish).await
}

async fn decide(
    state: &AppState,
    editor: &AuthUser,
    uuid: Uuid,
    transition: Transition,
) -> AppResult<Json<DataResponse<Release>>> {
    let mut tx = state.pool.begin().await?;
    let release = ReleaseRepo::find_by_uuid_for_update(&mut *tx, uuid)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Release", uuid)))?;

    let holder = EditorialRepo::find_by_release(&mut *tx, release.id)
        .await?
        .and_then(|entry| entry.editor_id);
    editorial::ensure_can_decide(holder, editor.user_id)?;

    let updated = transition_release(&mut *tx, &release, transition).await?;
    tx.commit().await?;

    tracing::info!(
        release_id = release.id,
        editor_id = editor.user_id,
        from = %release.status,
        to = %updated.status,
        "Editorial {}",
        transition.name()
    );
    state
        .event_bus
        .publish(status_changed_event(&updated, release.status, editor.user_id));

    Ok(Json(DataResponse { data: updated }))
}
