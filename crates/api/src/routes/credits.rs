//! Route definitions for the `/credits` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::credits;
use crate::state::AppState;

/// Routes mounted at `/credits`.
///
/// ```text
/// GET /         -> balances  (?company_id=)
/// GET /ledger   -> ledger    (?company_id=&limit=&offset=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(credits::balances))
        .route("/ledger", get(credits::ledger))
}
