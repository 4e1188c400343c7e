//! Handlers for the `/releases` resource.
//!
//! Every write that touches more than one row (create + debit, delete +
//! refund, upgrade + debit, status change + queue row) runs in one
//! transaction with the release row locked `FOR UPDATE`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pressroom_core::credits::{ProductType, REFUND_ONE};
use pressroom_core::distribution;
use pressroom_core::error::CoreError;
use pressroom_core::release::{
    apply_transition, apply_wizard_step, ensure_deletable, ensure_mutable, ReleaseStatus,
    Transition,
};
use pressroom_core::types::DbId;
use pressroom_db::models::credit::NewCreditEntry;
use pressroom_db::models::release::{CreateRelease, Release, ReleaseFilter, UpdateRelease};
use pressroom_db::repositories::{CreditRepo, EditorialRepo, ReleaseRepo};
use pressroom_events::{event_types, DomainEvent};
use serde::Deserialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::companies::find_modifiable;
use crate::handlers::credits::spend_one_credit;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /releases`.
#[derive(Debug, Default, Deserialize)]
pub struct ReleaseListParams {
    pub company_id: Option<DbId>,
    pub status: Option<ReleaseStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /releases/{uuid}/distribution`.
#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub product_type: ProductType,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn release_not_found(uuid: Uuid) -> AppError {
    AppError::Core(CoreError::not_found("Release", uuid))
}

/// Lock a release the caller may change, or fail with 404.
pub(crate) async fn lock_for_author(
    conn: &mut PgConnection,
    auth: &AuthUser,
    uuid: Uuid,
) -> AppResult<Release> {
    ReleaseRepo::find_by_uuid_for_update(conn, uuid)
        .await?
        .filter(|release| auth.can_modify(release.user_id))
        .ok_or_else(|| release_not_found(uuid))
}

/// Load a release the caller may see, or fail with 404.
pub(crate) async fn find_accessible(
    state: &AppState,
    auth: &AuthUser,
    uuid: Uuid,
) -> AppResult<Release> {
    ReleaseRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .filter(|release| auth.can_access(release.user_id))
        .ok_or_else(|| release_not_found(uuid))
}

/// Apply `transition` to a locked release and keep the editorial queue in
/// step: entering review enqueues, leaving review removes the queue row,
/// and `hold` keeps it.
pub(crate) async fn transition_release(
    conn: &mut PgConnection,
    release: &Release,
    transition: Transition,
) -> AppResult<Release> {
    let next = apply_transition(release.status, transition)?;
    let updated = ReleaseRepo::set_status(&mut *conn, release.id, next).await?;

    if next == ReleaseStatus::Editorial {
        EditorialRepo::enqueue(&mut *conn, release.id).await?;
    } else if !next.is_under_review() {
        EditorialRepo::remove(&mut *conn, release.id).await?;
    }

    Ok(updated)
}

/// Event announcing a status change from `from` to the release's current status.
pub(crate) fn status_changed_event(
    release: &Release,
    from: ReleaseStatus,
    actor_id: DbId,
) -> DomainEvent {
    DomainEvent::new(event_types::RELEASE_STATUS_CHANGED)
        .with_source("release", release.id)
        .with_actor(actor_id)
        .with_payload(serde_json::json!({
            "release_uuid": release.uuid,
            "from": from,
            "to": release.status,
        }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/releases?company_id=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<ReleaseListParams>,
) -> AppResult<Json<DataResponse<Vec<Release>>>> {
    let filter = ReleaseFilter {
        company_id: params.company_id,
        status: params.status,
    };
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let releases =
        ReleaseRepo::list_for_user(&state.pool, auth.user_id, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: releases }))
}

/// POST /api/v1/releases
///
/// Creates the release in `draftnxt` and debits one `pr` credit in the same
/// transaction. Answers 402 (and writes nothing) when no credit is available.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateRelease>,
) -> AppResult<(StatusCode, Json<DataResponse<Release>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Release title must not be empty".into()));
    }
    let company = find_modifiable(&state, &auth, input.company_id).await?;

    let mut tx = state.pool.begin().await?;
    let release = ReleaseRepo::create(&mut *tx, company.user_id, &input).await?;
    spend_one_credit(
        &mut *tx,
        company.user_id,
        company.id,
        ProductType::Pr,
        release.id,
        "Press release",
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = auth.user_id,
        release_id = release.id,
        company_id = company.id,
        "Release created"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::RELEASE_CREATED)
            .with_source("release", release.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "release_uuid": release.uuid,
                "company_id": release.company_id,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: release })))
}

/// GET /api/v1/releases/{uuid}
pub async fn get_by_uuid(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    let release = find_accessible(&state, &auth, uuid).await?;
    Ok(Json(DataResponse { data: release }))
}

/// PATCH /api/v1/releases/{uuid}
///
/// Wizard edit. Field edits keep the status; an optional `status` moves the
/// release along the wizard steps (`start -> draft -> draftnxt`).
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateRelease>,
) -> AppResult<Json<DataResponse<Release>>> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("Release title must not be empty".into()));
    }

    let mut tx = state.pool.begin().await?;
    let release = lock_for_author(&mut *tx, &auth, uuid).await?;
    ensure_mutable(release.status)?;

    let target = input
        .status
        .map(|target| apply_wizard_step(release.status, target))
        .transpose()?;
    let updated = ReleaseRepo::update(&mut *tx, release.id, &input, target).await?;
    tx.commit().await?;

    if updated.status != release.status {
        state
            .event_bus
            .publish(status_changed_event(&updated, release.status, auth.user_id));
    }

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/releases/{uuid}
///
/// Soft delete plus exactly one `+1 pr` refund row tied to the release. The
/// refund goes back to the scope the original `pr` debit was charged to.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let release = lock_for_author(&mut *tx, &auth, uuid).await?;
    ensure_deletable(release.status)?;

    if release.status.is_under_review() {
        EditorialRepo::remove(&mut *tx, release.id).await?;
    }
    if !ReleaseRepo::soft_delete(&mut *tx, release.id).await? {
        return Err(release_not_found(uuid));
    }

    let refund_scope =
        match CreditRepo::find_debit_for_release(&mut *tx, release.id, ProductType::Pr).await? {
            Some(debit) => debit.company_id,
            None => Some(release.company_id),
        };
    CreditRepo::append(
        &mut *tx,
        &NewCreditEntry {
            user_id: release.user_id,
            company_id: refund_scope,
            release_id: Some(release.id),
            credits: REFUND_ONE,
            product_type: ProductType::Pr,
            notes: Some("Refund for deleted release".to_string()),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = auth.user_id,
        release_id = release.id,
        status = %release.status,
        "Release deleted and refunded"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::RELEASE_DELETED)
            .with_source("release", release.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "release_uuid": release.uuid })),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/releases/{uuid}/submit
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    author_transition(&state, &auth, uuid, Transition::Submit).await
}

/// POST /api/v1/releases/{uuid}/retract
pub async fn retract(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
) -> AppResult<Json<DataResponse<Release>>> {
    author_transition(&state, &auth, uuid, Transition::Retract).await
}

async fn author_transition(
    state: &AppState,
    auth: &AuthUser,
    uuid: Uuid,
    transition: Transition,
) -> AppResult<Json<DataResponse<Release>>> {
    let mut tx = state.pool.begin().await?;
    let release = lock_for_author(&mut *tx, auth, uuid).await?;
    let updated = transition_release(&mut *tx, &release, transition).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = auth.user_id,
        release_id = release.id,
        from = %release.status,
        to = %updated.status,
        "Release {}",
        transition.name()
    );
    state
        .event_bus
        .publish(status_changed_event(&updated, release.status, auth.user_id));

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/releases/{uuid}/distribution
///
/// Buys a distribution upgrade: debits one credit of the requested product
/// type and appends its tag to the release's distribution.
pub async fn upgrade_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(uuid): AppPath<Uuid>,
    AppJson(input): AppJson<UpgradeRequest>,
) -> AppResult<Json<DataResponse<Release>>> {
    let mut tx = state.pool.begin().await?;
    let release = lock_for_author(&mut *tx, &auth, uuid).await?;
    ensure_mutable(release.status)?;

    let tags = distribution::add_upgrade(&release.distribution, input.product_type)?;
    spend_one_credit(
        &mut *tx,
        release.user_id,
        release.company_id,
        input.product_type,
        release.id,
        "Distribution upgrade",
    )
    .await?;
    let updated = ReleaseRepo::set_distribution(&mut *tx, release.id, &tags).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = auth.user_id,
        release_id = release.id,
        product_type = %input.product_type,
        "Release distribution upgraded"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::RELEASE_UPGRADED)
            .with_source("release", release.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "release_uuid": release.uuid,
                "product_type": input.product_type,
                "distribution": updated.distribution,
            })),
    );

    Ok(Json(DataResponse { data: updated }))
}
