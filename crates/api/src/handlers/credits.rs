//! Handlers for the `/credits` resource, plus the spend helper shared by
//! every handler that consumes a credit.

use axum::extract::State;
use axum::Json;
use pressroom_core::credits::{ensure_can_spend, CreditScope, ProductType, DEBIT_ONE};
use pressroom_core::types::DbId;
use pressroom_db::models::credit::{CreditEntry, NewCreditEntry, ProductBalance};
use pressroom_db::repositories::CreditRepo;
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::handlers::companies::find_accessible;
use crate::middleware::auth::AuthUser;
use crate::query::CompanyScopeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Balances for every product type in one scope.
#[derive(Debug, Serialize)]
pub struct CreditSummary {
    /// `None` when only account-level credits were summed.
    pub company_id: Option<DbId>,
    pub balances: Vec<ProductBalance>,
}

/// Debit one credit of `product_type` for a release on `company_id`.
///
/// Must run inside a transaction: the per-user advisory lock taken here is
/// held until that transaction ends, so a concurrent spend by the same user
/// waits and then sees this debit. Fails with 402 when nothing is available.
pub(crate) async fn spend_one_credit(
    conn: &mut PgConnection,
    user_id: DbId,
    company_id: DbId,
    product_type: ProductType,
    release_id: DbId,
    notes: &str,
) -> AppResult<CreditEntry> {
    CreditRepo::lock_user(&mut *conn, user_id).await?;

    let balance = CreditRepo::balance(&mut *conn, user_id, Some(company_id), product_type).await?;
    let scope = ensure_can_spend(&balance, product_type)?;

    let entry = NewCreditEntry {
        user_id,
        company_id: match scope {
            CreditScope::Brand => Some(company_id),
            CreditScope::Account => None,
        },
        release_id: Some(release_id),
        credits: DEBIT_ONE,
        product_type,
        notes: Some(notes.to_string()),
    };
    let row = CreditRepo::append(&mut *conn, &entry).await?;

    tracing::info!(
        user_id,
        company_id,
        release_id,
        product_type = %product_type,
        scope = ?scope,
        available_before = balance.available(),
        "Credit spent"
    );
    Ok(row)
}

/// GET /api/v1/credits?company_id=
///
/// Recomputes every balance from the ledger on each call.
pub async fn balances(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<CompanyScopeParams>,
) -> AppResult<Json<DataResponse<CreditSummary>>> {
    let owner_id = match params.company_id {
        Some(company_id) => find_accessible(&state, &auth, company_id).await?.user_id,
        None => auth.user_id,
    };

    let mut balances = Vec::with_capacity(ProductType::ALL.len());
    for product_type in ProductType::ALL {
        let balance =
            CreditRepo::balance(&state.pool, owner_id, params.company_id, product_type).await?;
        balances.push(ProductBalance::new(product_type, balance));
    }

    Ok(Json(DataResponse {
        data: CreditSummary {
            company_id: params.company_id,
            balances,
        },
    }))
}

/// GET /api/v1/credits/ledger?company_id=&limit=&offset=
pub async fn ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<CompanyScopeParams>,
) -> AppResult<Json<DataResponse<Vec<CreditEntry>>>> {
    let owner_id = match params.company_id {
        Some(company_id) => find_accessible(&state, &auth, company_id).await?.user_id,
        None => auth.user_id,
    };
    let (limit, offset) = params.pagination().resolve();

    let rows =
        CreditRepo::list_for_user(&state.pool, owner_id, params.company_id, limit, offset).await?;
    Ok(Json(DataResponse { data: rows }))
}
