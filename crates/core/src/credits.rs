//! Credit ledger arithmetic.
//!
//! The ledger is a list of signed rows. A row with `company_id = NULL` is
//! account-level and can be spent on any of the user's brands; a row with a
//! company id is brand-level. Balances are always recomputed from the rows
//! and are never cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Signed amount written when a credit is consumed.
pub const DEBIT_ONE: i32 = -1;

/// Signed amount written when a deleted release gives its credit back.
pub const REFUND_ONE: i32 = 1;

/// Upper bound on the magnitude of a single admin adjustment.
pub const MAX_GRANT_MAGNITUDE: i32 = 10_000;

// ---------------------------------------------------------------------------
// Product types
// ---------------------------------------------------------------------------

/// What a credit can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// A standard press release.
    Pr,
    /// Distribution upgrade to the Yahoo Finance wire.
    Yahoo,
    /// Enhanced distribution upgrade.
    Enhanced,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::Pr, ProductType::Yahoo, ProductType::Enhanced];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Pr => "pr",
            ProductType::Yahoo => "yahoo",
            ProductType::Enhanced => "enhanced",
        }
    }

    /// Whether this product is bought on top of an existing release rather
    /// than being the release itself.
    pub fn is_upgrade(self) -> bool {
        !matches!(self, ProductType::Pr)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid product type '{s}'. Must be one of: pr, yahoo, enhanced"
                ))
            })
    }
}

impl TryFrom<String> for ProductType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// Which ledger scope a debit is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditScope {
    /// Rows carrying the release's `company_id`.
    Brand,
    /// Rows with `company_id IS NULL`.
    Account,
}

/// The two sums that make up what a user can spend on one brand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub brand: i64,
    pub account: i64,
}

impl Balance {
    pub fn new(brand: i64, account: i64) -> Self {
        Self { brand, account }
    }

    /// Brand balance plus account balance. May be negative.
    pub fn available(&self) -> i64 {
        self.brand + self.account
    }

    pub fn has_credits(&self) -> bool {
        self.available() > 0
    }

    /// Brand credits are spent first; the account pool covers the rest.
    pub fn debit_scope(&self) -> CreditScope {
        if self.brand > 0 {
            CreditScope::Brand
        } else {
            CreditScope::Account
        }
    }
}

/// Decide where a one-credit spend is charged, or fail with
/// [`CoreError::InsufficientCredits`] when nothing is available.
pub fn ensure_can_spend(balance: &Balance, product: ProductType) -> Result<CreditScope, CoreError> {
    if !balance.has_credits() {
        return Err(CoreError::InsufficientCredits {
            product_type: product.as_str(),
            available: balance.available(),
        });
    }
    Ok(balance.debit_scope())
}

/// Validate an admin grant or adjustment amount.
pub fn validate_grant_amount(credits: i32) -> Result<(), CoreError> {
    if credits == 0 {
        return Err(CoreError::Validation(
            "Credit adjustment must be non-zero".to_string(),
        ));
    }
    if credits.abs() > MAX_GRANT_MAGNITUDE {
        return Err(CoreError::Validation(format!(
            "Credit adjustment magnitude must not exceed {MAX_GRANT_MAGNITUDE}"
        )));
    }
    Ok(())
}
