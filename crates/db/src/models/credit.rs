//! Credit ledger models.

use pressroom_core::credits::{Balance, ProductType};
use pressroom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `credit_ledger` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditEntry {
    pub id: DbId,
    pub user_id: DbId,
    /// `None` for account-level credits.
    pub company_id: Option<DbId>,
    pub release_id: Option<DbId>,
    pub credits: i32,
    #[sqlx(try_from = "String")]
    pub product_type: ProductType,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a ledger row.
#[derive(Debug, Clone)]
pub struct NewCreditEntry {
    pub user_id: DbId,
    pub company_id: Option<DbId>,
    pub release_id: Option<DbId>,
    pub credits: i32,
    pub product_type: ProductType,
    pub notes: Option<String>,
}

/// Admin request body for granting or adjusting credits.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantCredits {
    pub user_id: DbId,
    pub company_id: Option<DbId>,
    pub credits: i32,
    pub product_type: ProductType,
    pub notes: Option<String>,
}

/// Balance of one product type, as returned by the credits endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProductBalance {
    pub product_type: ProductType,
    pub brand: i64,
    pub account: i64,
    pub available: i64,
}

impl ProductBalance {
    pub fn new(product_type: ProductType, balance: Balance) -> Self {
        Self {
            product_type,
            brand: balance.brand,
            account: balance.account,
            available: balance.available(),
        }
    }
}
