//! The vacation balance ledger.
//!
//! `used` and `planned` are always rederived from the stored vacation
//! periods; `remaining` is rederived from its inputs inside the same
//! statement that writes them. "Today" is an explicit parameter so the
//! used/planned split never depends on the wall clock.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use timetrack_core::balance::{split_used_planned, PeriodTotal, DEFAULT_ANNUAL_ALLOWANCE_DAYS};
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::time_off::TimeOffKind;
use timetrack_db::models::vacation_balance::{UpdateVacationBalance, VacationBalance};
use timetrack_db::repositories::{TimeOffRepo, UserRepo, VacationBalanceRepo};
use validator::Validate;

use crate::calendar::WorkingDaysCalculator;
use crate::error::ServiceResult;

/// Per-user, per-year vacation entitlement accounting.
pub struct VacationBalanceService;

impl VacationBalanceService {
    /// Rederive used/planned days for (user, year) from all vacation
    /// periods overlapping that year, and persist the result.
    ///
    /// Creates the balance row with the default allowance when absent.
    /// The write is a single upsert, so a failed recalculation never
    /// leaves a partially updated row.
    pub async fn recalculate(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
        today: NaiveDate,
    ) -> ServiceResult<VacationBalance> {
        tracing::info!(user_id, year, "Recalculating vacation balance");

        UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let (year_start, year_end) = year_bounds(year)?;
        let entries = TimeOffRepo::list_overlapping_of_kind(
            pool,
            user_id,
            TimeOffKind::Vacation,
            year_start,
            year_end,
        )
        .await?;

        let mut totals = Vec::with_capacity(entries.len());
        for entry in &entries {
            let days = WorkingDaysCalculator::days_for_time_off(pool, entry).await?;
            totals.push(PeriodTotal {
                end_date: entry.end_date,
                days,
            });
        }
        let (used, planned) = split_used_planned(&totals, today);

        let balance = VacationBalanceRepo::upsert_recalculated(
            pool,
            user_id,
            year,
            DEFAULT_ANNUAL_ALLOWANCE_DAYS,
            used,
            planned,
        )
        .await?;
        tracing::info!(
            user_id,
            year,
            used = %balance.used_days,
            planned = %balance.planned_days,
            remaining = %balance.remaining_days,
            "Updated vacation balance"
        );
        Ok(balance)
    }

    /// The balance row for (user, year), created lazily on first access.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
        today: NaiveDate,
    ) -> ServiceResult<VacationBalance> {
        if let Some(balance) = VacationBalanceRepo::find_by_user_and_year(pool, user_id, year).await?
        {
            return Ok(balance);
        }
        Self::recalculate(pool, user_id, year, today).await
    }

    /// All balance rows of a user.
    pub async fn list(pool: &PgPool, user_id: DbId) -> ServiceResult<Vec<VacationBalance>> {
        Ok(VacationBalanceRepo::list_by_user(pool, user_id).await?)
    }

    /// Adjust the manually managed entitlement fields (allowance,
    /// carryover, adjustment); `remaining` is rederived in the same
    /// statement.
    pub async fn set_entitlement(
        pool: &PgPool,
        user_id: DbId,
        year: i32,
        input: &UpdateVacationBalance,
        today: NaiveDate,
    ) -> ServiceResult<VacationBalance> {
        input.validate()?;
        if let Some(allowance) = input.annual_allowance_days {
            if allowance < Decimal::ZERO {
                return Err(CoreError::Validation(
                    "Annual allowance must not be negative".into(),
                )
                .into());
            }
        }

        // Make sure the row exists before the targeted update.
        Self::get_or_create(pool, user_id, year, today).await?;

        let updated = VacationBalanceRepo::update_entitlement(
            pool,
            user_id,
            year,
            input.annual_allowance_days,
            input.carried_over_days,
            input.adjustment_days,
        )
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "Vacation balance for user {user_id} and year {year} vanished during update"
            ))
        })?;
        tracing::info!(user_id, year, remaining = %updated.remaining_days, "Updated vacation entitlement");
        Ok(updated)
    }
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(CoreError::Validation(format!("Invalid year: {year}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn year_bounds_cover_the_whole_year() {
        let (start, end) = year_bounds(2025).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert_matches!(year_bounds(i32::MAX), Err(CoreError::Validation(_)));
    }
}
