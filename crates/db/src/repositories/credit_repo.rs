//! Repository for the append-only `credit_ledger` table.
//!
//! There is deliberately no update or delete here: corrections are new rows.

use pressroom_core::credits::{Balance, ProductType};
use pressroom_core::types::DbId;
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};

use crate::models::credit::{CreditEntry, NewCreditEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, company_id, release_id, credits, product_type, notes, created_at";

#[derive(FromRow)]
struct BalanceRow {
    brand: i64,
    account: i64,
}

/// Provides ledger reads and appends.
pub struct CreditRepo;

impl CreditRepo {
    /// Append a signed row, returning it.
    pub async fn append<'e, E>(
        executor: E,
        entry: &NewCreditEntry,
    ) -> Result<CreditEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO credit_ledger
                (user_id, company_id, release_id, credits, product_type, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CreditEntry>(&query)
            .bind(entry.user_id)
            .bind(entry.company_id)
            .bind(entry.release_id)
            .bind(entry.credits)
            .bind(entry.product_type.as_str())
            .bind(&entry.notes)
            .fetch_one(executor)
            .await
    }

    /// Sum the brand-level rows for `company_id` and the account-level rows
    /// for `user_id` in one pass.
    ///
    /// With `company_id = None` only the account-level sum is meaningful and
    /// the brand sum is zero.
    pub async fn balance<'e, E>(
        executor: E,
        user_id: DbId,
        company_id: Option<DbId>,
        product_type: ProductType,
    ) -> Result<Balance, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, BalanceRow>(
            "SELECT
                COALESCE(SUM(credits) FILTER (WHERE company_id = $2), 0)::BIGINT AS brand,
                COALESCE(SUM(credits) FILTER (WHERE company_id IS NULL), 0)::BIGINT AS account
             FROM credit_ledger
             WHERE user_id = $1 AND product_type = $3",
        )
        .bind(user_id)
        .bind(company_id)
        .bind(product_type.as_str())
        .fetch_one(executor)
        .await?;
        Ok(Balance::new(row.brand, row.account))
    }

    /// Serialize ledger spends for one user until the surrounding
    /// transaction ends.
    pub async fn lock_user(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// List a user's ledger rows, newest first.
    ///
    /// With `company_id` set, returns that brand's rows plus account-level rows.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        company_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_ledger
             WHERE user_id = $1
               AND ($2::BIGINT IS NULL OR company_id = $2 OR company_id IS NULL)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, CreditEntry>(&query)
            .bind(user_id)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The earliest debit of `product_type` recorded against a release.
    ///
    /// Refunds go back to the scope this row was charged to.
    pub async fn find_debit_for_release<'e, E>(
        executor: E,
        release_id: DbId,
        product_type: ProductType,
    ) -> Result<Option<CreditEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_ledger
             WHERE release_id = $1 AND product_type = $2 AND credits < 0
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, CreditEntry>(&query)
            .bind(release_id)
            .bind(product_type.as_str())
            .fetch_optional(executor)
            .await
    }

    /// All rows tied to one release, oldest first.
    pub async fn list_for_release(
        pool: &PgPool,
        release_id: DbId,
    ) -> Result<Vec<CreditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_ledger WHERE release_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CreditEntry>(&query)
            .bind(release_id)
            .fetch_all(pool)
            .await
    }
}
