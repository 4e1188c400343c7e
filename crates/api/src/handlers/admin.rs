//! Handlers for `/admin` credit management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pressroom_core::credits::validate_grant_amount;
use pressroom_core::error::CoreError;
use pressroom_core::types::DbId;
use pressroom_db::models::credit::{CreditEntry, GrantCredits, NewCreditEntry};
use pressroom_db::repositories::{CompanyRepo, CreditRepo, UserRepo};
use pressroom_events::{event_types, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/credits
///
/// Grant (positive) or adjust (negative) a user's credits. Corrections are
/// new rows; existing ledger rows are never touched.
pub async fn grant_credits(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<GrantCredits>,
) -> AppResult<(StatusCode, Json<DataResponse<CreditEntry>>)> {
    validate_grant_amount(input.credits)?;

    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", input.user_id)))?;

    if let Some(company_id) = input.company_id {
        let company = CompanyRepo::find_by_id(&state.pool, company_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Company", company_id)))?;
        if company.user_id != input.user_id {
            return Err(AppError::BadRequest(format!(
                "Company {company_id} does not belong to user {}",
                input.user_id
            )));
        }
    }

    let entry = CreditRepo::append(
        &state.pool,
        &NewCreditEntry {
            user_id: input.user_id,
            company_id: input.company_id,
            release_id: None,
            credits: input.credits,
            product_type: input.product_type,
            notes: input.notes.clone(),
        },
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = entry.user_id,
        company_id = ?entry.company_id,
        credits = entry.credits,
        product_type = %entry.product_type,
        "Credits granted"
    );
    state.event_bus.publish(
        DomainEvent::new(event_types::CREDITS_GRANTED)
            .with_source("user", entry.user_id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({
                "ledger_id": entry.id,
                "company_id": entry.company_id,
                "credits": entry.credits,
                "product_type": entry.product_type,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/admin/users/{id}/credits?limit=&offset=
pub async fn user_ledger(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(user_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CreditEntry>>>> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    let (limit, offset) = params.resolve();
    let rows = CreditRepo::list_for_user(&state.pool, user_id, None, limit, offset).await?;
    Ok(Json(DataResponse { data: rows }))
}
