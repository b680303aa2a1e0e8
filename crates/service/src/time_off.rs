//! Use cases for time-off entries.
//!
//! Vacation-type mutations trigger a balance recalculation for every
//! year the entry touches; on updates that includes the years of the old
//! range, since a period can move across a year boundary.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::time_off::{CreateTimeOff, TimeOff, UpdateTimeOff};
use timetrack_db::repositories::{TimeOffRepo, UserRepo};
use validator::Validate;

use crate::error::ServiceResult;
use crate::vacation_balance::VacationBalanceService;

/// CRUD over time-off entries with balance recalculation triggers.
pub struct TimeOffService;

impl TimeOffService {
    /// Create a time-off entry.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTimeOff,
        today: NaiveDate,
    ) -> ServiceResult<TimeOff> {
        input.validate()?;
        validate_period(input.start_date, input.end_date, input.hours_per_day)?;

        UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let created = TimeOffRepo::create(pool, user_id, input).await?;
        tracing::info!(user_id, time_off_id = created.id, "Created time-off entry");

        if created.is_vacation() {
            let years = affected_years(&[(created.start_date, created.end_date)]);
            recalculate_years(pool, user_id, &years, today).await?;
        }
        Ok(created)
    }

    /// Fetch an entry the user owns.
    pub async fn get(pool: &PgPool, user_id: DbId, id: DbId) -> ServiceResult<TimeOff> {
        owned_entry(pool, user_id, id).await
    }

    /// All entries of a user overlapping the inclusive range.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<TimeOff>> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "End date {end} is before start date {start}"
            ))
            .into());
        }
        Ok(TimeOffRepo::list_overlapping(pool, user_id, start, end).await?)
    }

    /// Update any subset of an entry's fields.
    ///
    /// When either the old or the new state is vacation, balances are
    /// recalculated for the union of both ranges' years.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateTimeOff,
        today: NaiveDate,
    ) -> ServiceResult<TimeOff> {
        input.validate()?;
        let mut entry = owned_entry(pool, user_id, id).await?;

        let was_vacation = entry.is_vacation();
        let old_range = (entry.start_date, entry.end_date);

        if let Some(start) = input.start_date {
            entry.start_date = start;
        }
        if let Some(end) = input.end_date {
            entry.end_date = end;
        }
        if let Some(kind) = input.time_off_type {
            entry.time_off_type = kind.as_str().to_string();
        }
        if let Some(hours) = input.hours_per_day {
            entry.hours_per_day = hours;
        }
        if let Some(notes) = &input.notes {
            entry.notes = notes.clone();
        }

        validate_period(entry.start_date, entry.end_date, entry.hours_per_day)?;

        let updated = TimeOffRepo::update(pool, &entry)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "time-off entry",
                id,
            })?;
        tracing::info!(user_id, time_off_id = id, "Updated time-off entry");

        if was_vacation || updated.is_vacation() {
            let years = affected_years(&[old_range, (updated.start_date, updated.end_date)]);
            recalculate_years(pool, user_id, &years, today).await?;
        }
        Ok(updated)
    }

    /// Delete an entry the user owns, then restore the balance it touched.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let entry = owned_entry(pool, user_id, id).await?;
        let was_vacation = entry.is_vacation();
        let range = (entry.start_date, entry.end_date);

        TimeOffRepo::delete(pool, id).await?;
        tracing::info!(user_id, time_off_id = id, "Deleted time-off entry");

        if was_vacation {
            let years = affected_years(&[range]);
            recalculate_years(pool, user_id, &years, today).await?;
        }
        Ok(())
    }
}

/// Load an entry and verify it belongs to `user_id`.
async fn owned_entry(pool: &PgPool, user_id: DbId, id: DbId) -> ServiceResult<TimeOff> {
    let entry = TimeOffRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "time-off entry",
            id,
        })?;
    if entry.user_id != user_id {
        return Err(CoreError::Forbidden("Time-off entry belongs to a different user".into()).into());
    }
    Ok(entry)
}

fn validate_period(
    start: NaiveDate,
    end: NaiveDate,
    hours_per_day: Option<Decimal>,
) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(
            "End date must not be before the start date".into(),
        ));
    }
    if let Some(hours) = hours_per_day {
        if hours < Decimal::ZERO {
            return Err(CoreError::Validation(
                "Hours per day must not be negative".into(),
            ));
        }
    }
    Ok(())
}

/// Every calendar year touched by any of the ranges.
fn affected_years(ranges: &[(NaiveDate, NaiveDate)]) -> BTreeSet<i32> {
    let mut years = BTreeSet::new();
    for &(start, end) in ranges {
        years.extend(start.year()..=end.year());
    }
    years
}

async fn recalculate_years(
    pool: &PgPool,
    user_id: DbId,
    years: &BTreeSet<i32>,
    today: NaiveDate,
) -> ServiceResult<()> {
    for &year in years {
        VacationBalanceService::recalculate(pool, user_id, year, today).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_year_range_yields_one_year() {
        let years = affected_years(&[(date(2025, 3, 1), date(2025, 3, 10))]);
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2025]);
    }

    #[test]
    fn year_spanning_range_yields_both_years() {
        let years = affected_years(&[(date(2025, 12, 29), date(2026, 1, 2))]);
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2025, 2026]);
    }

    #[test]
    fn old_and_new_ranges_are_unioned() {
        let years = affected_years(&[
            (date(2024, 7, 1), date(2024, 7, 5)),
            (date(2026, 7, 1), date(2026, 7, 5)),
        ]);
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2024, 2026]);
    }

    #[test]
    fn inverted_period_is_rejected() {
        let err = validate_period(date(2025, 5, 10), date(2025, 5, 1), None).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn negative_hours_override_is_rejected() {
        let err =
            validate_period(date(2025, 5, 1), date(2025, 5, 10), Some(dec!(-1))).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn valid_period_passes() {
        assert!(validate_period(date(2025, 5, 1), date(2025, 5, 10), Some(dec!(4))).is_ok());
    }
}
