//! Domain rules for the pressroom backend.
//!
//! No database or HTTP dependencies live here. The repository layer and the
//! route handlers both call into these modules for credit arithmetic and
//! release status rules.

pub mod approval;
pub mod credits;
pub mod distribution;
pub mod editorial;
pub mod error;
pub mod paging;
pub mod release;
pub mod roles;
pub mod types;
