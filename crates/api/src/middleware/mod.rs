//! Request extractors for authentication ([`auth::AuthUser`]) and role
//! gating ([`rbac::RequireEditor`], [`rbac::RequireAdmin`]).

pub mod auth;
pub mod rbac;
