//! Pressroom HTTP API: press-release drafting, credits, editorial review and
//! stakeholder approvals. The binary in `main.rs` and the integration tests
//! both build on this library.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
