//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement reads take `&PgPool`; anything that participates in a
//! multi-statement write takes a generic [`sqlx::PgExecutor`] so callers can
//! pass either the pool or `&mut *tx`.

pub mod approval_repo;
pub mod company_repo;
pub mod credit_repo;
pub mod editorial_repo;
pub mod release_repo;
pub mod user_repo;

pub use approval_repo::ApprovalRepo;
pub use company_repo::CompanyRepo;
pub use credit_repo::CreditRepo;
pub use editorial_repo::EditorialRepo;
pub use release_repo::ReleaseRepo;
pub use user_repo::UserRepo;
