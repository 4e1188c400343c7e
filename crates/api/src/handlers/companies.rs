//! Handlers for the `/companies` resource (brands).
//!
//! Companies are private to the user that created them. A company the caller
//! may not see answers 404, the same as one that does not exist. Staff can
//! read any company; only the owner or an admin can change one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pressroom_core::error::CoreError;
use pressroom_core::types::DbId;
use pressroom_db::models::company::{Company, CreateCompany, UpdateCompany};
use pressroom_db::repositories::CompanyRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a company the caller may see, or fail with 404.
pub(crate) async fn find_accessible(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|company| auth.can_access(company.user_id))
        .ok_or_else(|| AppError::Core(CoreError::not_found("Company", id)))
}

/// Load a company the caller may change, or fail with 404.
pub(crate) async fn find_modifiable(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|company| auth.can_modify(company.user_id))
        .ok_or_else(|| AppError::Core(CoreError::not_found("Company", id)))
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Company name must not be empty".into()));
    }
    Ok(())
}

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<Company>>)> {
    validate_name(&input.name)?;
    let company = CompanyRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, company_id = company.id, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// GET /api/v1/companies
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let companies = CompanyRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = find_accessible(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: company }))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateCompany>,
) -> AppResult<Json<DataResponse<Company>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let existing = find_modifiable(&state, &auth, id).await?;
    let company = CompanyRepo::update(&state.pool, existing.id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Company", id)))?;
    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/companies/{id}
///
/// Soft delete. The company's ledger rows are kept.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_modifiable(&state, &auth, id).await?;
    if CompanyRepo::soft_delete(&state.pool, existing.id).await? {
        tracing::info!(user_id = auth.user_id, company_id = id, "Company deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Company", id)))
    }
}
