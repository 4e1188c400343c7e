pub mod admin;
pub mod approvals;
pub mod auth;
pub mod companies;
pub mod credits;
pub mod editorial;
pub mod releases;
