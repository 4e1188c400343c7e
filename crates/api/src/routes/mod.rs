pub mod admin;
pub mod approvals;
pub mod auth;
pub mod companies;
pub mod credits;
pub mod editorial;
pub mod health;
pub mod releases;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /companies                                       list, create
/// /companies/{id}                                  get, update, delete
///
/// /credits                                         balances per product type
/// /credits/ledger                                  ledger rows
///
/// /releases                                        list, create (debits 1 pr)
/// /releases/{uuid}                                 get, wizard edit, delete (refunds 1 pr)
/// /releases/{uuid}/submit                          submit for review
/// /releases/{uuid}/retract                         pull back from review
/// /releases/{uuid}/distribution                    buy upgrade (debits 1)
/// /releases/{uuid}/approvals                       list, request sign-off
///
/// /approvals/{uuid}                                stakeholder view (public)
/// /approvals/{uuid}/sign                           stakeholder decision (public)
///
/// /editorial/queue                                 review worklist (editor)
/// /editorial/queue/{uuid}/checkout                 take checkout
/// /editorial/queue/{uuid}/release                  drop checkout
/// /editorial/queue/{uuid}/approve                  approve
/// /editorial/queue/{uuid}/hold                     hold
/// /editorial/queue/{uuid}/reject                   reject
/// /editorial/releases/{uuid}/publish               approved -> sent
///
/// /admin/credits                                   grant / adjust (admin)
/// /admin/users/{id}/credits                        user ledger (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/companies", companies::router())
        .nest("/credits", credits::router())
        .nest("/releases", releases::router())
        .nest("/approvals", approvals::router())
        .nest("/editorial", editorial::router())
        .nest("/admin", admin::router())
}
