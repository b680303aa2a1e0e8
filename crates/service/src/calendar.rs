//! Working-days calculation over loaded user data.
//!
//! Loads the user's configuration, rules, and absences through the
//! repositories, then hands classification to the pure
//! [`CalendarContext`] from `timetrack-core`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::holidays::Region;
use timetrack_core::types::DbId;
use timetrack_core::working_days::{CalendarContext, RuleWithExemptions, WorkWeek};
use timetrack_db::models::time_off::TimeOff;
use timetrack_db::repositories::{
    ExemptionRepo, RecurringOffDayRepo, TimeOffRepo, UserRepo, WorkingHoursRepo,
};

use crate::error::ServiceResult;

/// Computes fractional working-day totals for a user.
pub struct WorkingDaysCalculator;

impl WorkingDaysCalculator {
    /// Sum of working-day credits over the inclusive range `start..=end`.
    pub async fn total_working_days(
        pool: &PgPool,
        user_id: DbId,
        region: Region,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Decimal> {
        let ctx = Self::load_context(pool, user_id, region, start, end, None, true).await?;
        Ok(ctx.working_days_in_range(start, end)?)
    }

    /// Working-day credit (0, 0.5, or 1) for a single date.
    pub async fn day_credit(
        pool: &PgPool,
        user_id: DbId,
        region: Region,
        date: NaiveDate,
    ) -> ServiceResult<Decimal> {
        let ctx = Self::load_context(pool, user_id, region, date, date, None, true).await?;
        Ok(ctx.day_credit(date))
    }

    /// Working-day total of one stored time-off period.
    ///
    /// Vacation periods are classified normally. Non-vacation periods
    /// ignore recurring off-days (sick and personal leave outrank them in
    /// the precedence order) and exclude themselves from the
    /// other-absence set, so a period never cancels its own days.
    pub async fn days_for_time_off(pool: &PgPool, entry: &TimeOff) -> ServiceResult<Decimal> {
        let user = UserRepo::find_by_id(pool, entry.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: entry.user_id,
            })?;
        let region = user.region()?;

        let include_recurring = entry.is_vacation();
        let ctx = Self::load_context(
            pool,
            entry.user_id,
            region,
            entry.start_date,
            entry.end_date,
            Some(entry.id),
            include_recurring,
        )
        .await?;
        Ok(ctx.working_days_in_range(entry.start_date, entry.end_date)?)
    }

    /// Load everything classification needs for `user_id` over a range.
    ///
    /// Malformed rows (incoherent rule parameters, out-of-range weekday)
    /// are logged and skipped so a single bad row cannot abort an
    /// aggregate calculation.
    pub async fn load_context(
        pool: &PgPool,
        user_id: DbId,
        region: Region,
        start: NaiveDate,
        end: NaiveDate,
        exclude_time_off: Option<DbId>,
        include_recurring: bool,
    ) -> ServiceResult<CalendarContext> {
        let user = UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let mut week = Vec::new();
        for row in WorkingHoursRepo::find_by_user(pool, user_id).await? {
            match row.to_schedule() {
                Ok(schedule) => week.push(schedule),
                Err(err) => tracing::warn!(
                    user_id,
                    weekday = row.weekday,
                    error = %err,
                    "skipping malformed working-hours row"
                ),
            }
        }

        let mut rules = Vec::new();
        if include_recurring {
            for row in RecurringOffDayRepo::list_by_user(pool, user_id).await? {
                let rule = match row.to_rule() {
                    Ok(rule) => rule,
                    Err(err) => {
                        tracing::warn!(
                            rule_id = row.id,
                            error = %err,
                            "skipping malformed recurring off-day"
                        );
                        continue;
                    }
                };
                let exempt_dates: BTreeSet<NaiveDate> = ExemptionRepo::dates_for_rule(pool, row.id)
                    .await?
                    .into_iter()
                    .collect();
                rules.push(RuleWithExemptions { rule, exempt_dates });
            }
        }

        let mut other_absences = Vec::new();
        for entry in TimeOffRepo::list_overlapping(pool, user_id, start, end).await? {
            if entry.is_vacation() || exclude_time_off == Some(entry.id) {
                continue;
            }
            other_absences.push((entry.start_date, entry.end_date));
        }

        Ok(CalendarContext {
            region,
            half_day_holidays: user.half_day_holidays_enabled,
            week: WorkWeek::new(week),
            rules,
            other_absences,
        })
    }
}
