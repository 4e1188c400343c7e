//! Route definitions for the `/editorial` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::editorial;
use crate::state::AppState;

/// Routes mounted at `/editorial`. All require the `editor` or `admin` role.
///
/// ```text
/// GET  /queue                       -> queue
/// POST /queue/{uuid}/checkout       -> checkout
/// POST /queue/{uuid}/release        -> release_checkout
/// POST /queue/{uuid}/approve        -> approve
/// POST /queue/{uuid}/hold           -> hold
/// POST /queue/{uuid}/reject         -> reject
/// POST /releases/{uuid}/publish     -> publish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/queue", get(editorial::queue))
        .route("/queue/{uuid}/checkout", post(editorial::checkout))
        .route("/queue/{uuid}/release", post(editorial::release_checkout))
        .route("/queue/{uuid}/approve", post(editorial::approve))
        .route("/queue/{uuid}/hold", post(editorial::hold))
        .route("/queue/{uuid}/reject", post(editorial::reject))
        .route("/releases/{uuid}/publish", post(editorial::publish))
}
