//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the `admin` role.
///
/// ```text
/// POST /credits              -> grant_credits
/// GET  /users/{id}/credits   -> user_ledger
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/credits", post(admin::grant_credits))
        .route("/users/{id}/credits", get(admin::user_ledger))
}
