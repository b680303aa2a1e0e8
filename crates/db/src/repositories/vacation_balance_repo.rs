//! Repository for the `vacation_balance` table.

use rust_decimal::Decimal;
use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::vacation_balance::VacationBalance;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, year, annual_allowance_days, carried_over_days, \
                       adjustment_days, used_days, planned_days, remaining_days, \
                       created_at, updated_at";

/// Provides data access for per-year vacation balances.
pub struct VacationBalanceRepo;

impl VacationBalanceRepo {
    /// The balance row for (user, year), if one exists.
    pub async fn find_by_user_and_year(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
    ) -> Result<Option<VacationBalance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vacation_balance WHERE user_id = $1 AND year = $2"
        );
        sqlx::query_as::<_, VacationBalance>(&query)
            .bind(user_id)
            .bind(year)
            .fetch_optional(pool)
            .await
    }

    /// All balance rows of a user, oldest year first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<VacationBalance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vacation_balance WHERE user_id = $1 ORDER BY year"
        );
        sqlx::query_as::<_, VacationBalance>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Write the recalculated used/planned totals for (user, year).
    ///
    /// A missing row is created with `default_allowance`; an existing row
    /// keeps its entitlement fields. `remaining_days` is rederived from
    /// the row's own entitlement columns in the same statement, so the
    /// write is all-or-nothing and never leaves a stale remainder.
    pub async fn upsert_recalculated(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
        default_allowance: Decimal,
        used: Decimal,
        planned: Decimal,
    ) -> Result<VacationBalance, sqlx::Error> {
        let query = format!(
            "INSERT INTO vacation_balance \
                 (user_id, year, annual_allowance_days, used_days, planned_days, remaining_days) \
             VALUES ($1, $2, $3, $4, $5, $3 - $4 - $5) \
             ON CONFLICT (user_id, year) DO UPDATE SET \
                 used_days      = EXCLUDED.used_days, \
                 planned_days   = EXCLUDED.planned_days, \
                 remaining_days = vacation_balance.annual_allowance_days \
                                  + vacation_balance.carried_over_days \
                                  + vacation_balance.adjustment_days \
                                  - EXCLUDED.used_days \
                                  - EXCLUDED.planned_days, \
                 updated_at     = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VacationBalance>(&query)
            .bind(user_id)
            .bind(year)
            .bind(default_allowance)
            .bind(used)
            .bind(planned)
            .fetch_one(pool)
            .await
    }

    /// Update the manually managed entitlement fields of an existing row,
    /// rederiving `remaining_days` in the same statement.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update_entitlement(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
        allowance: Option<Decimal>,
        carried_over: Option<Decimal>,
        adjustment: Option<Decimal>,
    ) -> Result<Option<VacationBalance>, sqlx::Error> {
        let query = format!(
            "UPDATE vacation_balance SET \
                 annual_allowance_days = COALESCE($3, annual_allowance_days), \
                 carried_over_days     = COALESCE($4, carried_over_days), \
                 adjustment_days       = COALESCE($5, adjustment_days), \
                 remaining_days        = COALESCE($3, annual_allowance_days) \
                                         + COALESCE($4, carried_over_days) \
                                         + COALESCE($5, adjustment_days) \
                                         - used_days - planned_days, \
                 updated_at            = NOW() \
             WHERE user_id = $1 AND year = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VacationBalance>(&query)
            .bind(user_id)
            .bind(year)
            .bind(allowance)
            .bind(carried_over)
            .bind(adjustment)
            .fetch_optional(pool)
            .await
    }
}
