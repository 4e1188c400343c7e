//! Route definitions for the `/releases` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{approvals, releases};
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{uuid}                  -> get_by_uuid
/// PATCH  /{uuid}                  -> update
/// DELETE /{uuid}                  -> delete
/// POST   /{uuid}/submit           -> submit
/// POST   /{uuid}/retract          -> retract
/// POST   /{uuid}/distribution     -> upgrade_distribution
/// GET    /{uuid}/approvals        -> approvals::list_for_release
/// POST   /{uuid}/approvals        -> approvals::request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(releases::list).post(releases::create))
        .route(
            "/{uuid}",
            get(releases::get_by_uuid)
                .patch(releases::update)
                .delete(releases::delete),
        )
        .route("/{uuid}/submit", post(releases::submit))
        .route("/{uuid}/retract", post(releases::retract))
        .route("/{uuid}/distribution", post(releases::upgrade_distribution))
        .route(
            "/{uuid}/approvals",
            get(approvals::list_for_release).post(approvals::request),
        )
}
