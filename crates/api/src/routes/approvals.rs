//! Route definitions for the public `/approvals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::approvals;
use crate::state::AppState;

/// Routes mounted at `/approvals`. No authentication.
///
/// ```text
/// GET  /{uuid}        -> get_public
/// POST /{uuid}/sign   -> sign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{uuid}", get(approvals::get_public))
        .route("/{uuid}/sign", post(approvals::sign))
}
