//! Working-day classification.
//!
//! Produces a fractional work-day credit (0, 0.5, or 1) for a single date
//! from all applicable exclusion sources, and sums it over inclusive date
//! ranges. The precedence order is fixed: an employee is never charged a
//! vacation day for a date they could not have worked anyway.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::holidays::{self, Region};
use crate::recurrence::OffDayRule;

/// Credit for an ordinary working day.
pub const FULL_DAY: Decimal = Decimal::ONE;
/// Credit for a half-day holiday (Dec 24 / Dec 31 with the flag enabled).
pub const HALF_DAY: Decimal = dec!(0.5);

/// Minutes per hour, for deriving hours from start/end times.
const MINUTES_PER_HOUR: Decimal = dec!(60);

/// Working-hours configuration for one weekday of a user's week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySchedule {
    pub weekday: Weekday,
    pub is_working_day: bool,
    /// Nominal hours; superseded by start/end times when both are set.
    pub hours: Decimal,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_minutes: i32,
}

impl WeekdaySchedule {
    /// Target hours for this weekday.
    ///
    /// Derived from `end - start - break` when both times are present,
    /// otherwise the literal `hours` value.
    pub fn effective_hours(&self) -> Decimal {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => {
                let minutes = (end - start).num_minutes() - i64::from(self.break_minutes);
                Decimal::from(minutes.max(0)) / MINUTES_PER_HOUR
            }
            _ => self.hours,
        }
    }
}

/// A user's full seven-day working-hours configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkWeek {
    days: Vec<WeekdaySchedule>,
}

impl WorkWeek {
    pub fn new(days: Vec<WeekdaySchedule>) -> Self {
        Self { days }
    }

    /// The schedule entry for a weekday, if configured.
    pub fn schedule_for(&self, weekday: Weekday) -> Option<&WeekdaySchedule> {
        self.days.iter().find(|d| d.weekday == weekday)
    }
}

/// A recurring off-day rule together with its exempted dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleWithExemptions {
    pub rule: OffDayRule,
    pub exempt_dates: BTreeSet<NaiveDate>,
}

impl RuleWithExemptions {
    /// Whether the rule claims `date` and no exemption suspends it there.
    pub fn claims(&self, date: NaiveDate) -> bool {
        self.rule.applies_to(date) && !self.exempt_dates.contains(&date)
    }
}

/// Everything needed to classify dates for one user, loaded up front so
/// classification itself is a pure function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarContext {
    pub region: Region,
    /// Whether Dec 24 and Dec 31 count as half working days for this user.
    pub half_day_holidays: bool,
    pub week: WorkWeek,
    pub rules: Vec<RuleWithExemptions>,
    /// Inclusive date ranges of non-vacation absences (sick, personal, ...).
    pub other_absences: Vec<(NaiveDate, NaiveDate)>,
}

/// Whether a date is one of the two designated half-day dates.
///
/// Keyed on the calendar date, not on holiday designation: Dec 24/31 are
/// half days under the flag even though they are not public holidays.
pub fn is_half_day_date(date: NaiveDate) -> bool {
    date.month() == 12 && matches!(date.day(), 24 | 31)
}

impl CalendarContext {
    /// Fractional work-day credit for a single date.
    ///
    /// Precedence, first match wins:
    /// 1. weekday not configured as working → 0
    /// 2. public holiday → 0 (half-day dates → 0.5 under the flag)
    /// 3. applicable, non-exempted recurring off-day → 0
    /// 4. covering non-vacation absence → 0
    /// 5. otherwise a full day, or 0.5 on half-day dates under the flag
    pub fn day_credit(&self, date: NaiveDate) -> Decimal {
        let working = self
            .week
            .schedule_for(date.weekday())
            .is_some_and(|s| s.is_working_day);
        if !working {
            return Decimal::ZERO;
        }

        if holidays::is_public_holiday(date, self.region) {
            if self.half_day_holidays && is_half_day_date(date) {
                return HALF_DAY;
            }
            return Decimal::ZERO;
        }

        if self.rules.iter().any(|r| r.claims(date)) {
            return Decimal::ZERO;
        }

        if self
            .other_absences
            .iter()
            .any(|&(start, end)| start <= date && date <= end)
        {
            return Decimal::ZERO;
        }

        if self.half_day_holidays && is_half_day_date(date) {
            HALF_DAY
        } else {
            FULL_DAY
        }
    }

    /// Sum of [`Self::day_credit`] over the inclusive range `start..=end`.
    pub fn working_days_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "End date {end} is before start date {start}"
            )));
        }

        let mut total = Decimal::ZERO;
        let mut day = start;
        while day <= end {
            total += self.day_credit(day);
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrencePattern;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Standard Mon-Fri week at eight hours per day.
    fn standard_week() -> WorkWeek {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        WorkWeek::new(
            weekdays
                .into_iter()
                .map(|weekday| WeekdaySchedule {
                    weekday,
                    is_working_day: !matches!(weekday, Weekday::Sat | Weekday::Sun),
                    hours: dec!(8),
                    start_time: None,
                    end_time: None,
                    break_minutes: 0,
                })
                .collect(),
        )
    }

    fn context(half_day_holidays: bool) -> CalendarContext {
        CalendarContext {
            region: Region::Berlin,
            half_day_holidays,
            week: standard_week(),
            rules: Vec::new(),
            other_absences: Vec::new(),
        }
    }

    fn weekly_monday_rule(reference: NaiveDate) -> RuleWithExemptions {
        RuleWithExemptions {
            rule: OffDayRule {
                id: 7,
                weekday: Weekday::Mon,
                pattern: RecurrencePattern::EveryNthWeek {
                    interval: 1,
                    reference,
                },
                start_date: date(2020, 1, 1),
                end_date: None,
                active: true,
            },
            exempt_dates: BTreeSet::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Single-date classification
    // -----------------------------------------------------------------------

    #[test]
    fn ordinary_weekday_is_a_full_day() {
        assert_eq!(context(false).day_credit(date(2025, 7, 15)), FULL_DAY);
    }

    #[test]
    fn weekend_is_zero() {
        let ctx = context(false);
        assert_eq!(ctx.day_credit(date(2025, 7, 19)), Decimal::ZERO); // Saturday
        assert_eq!(ctx.day_credit(date(2025, 7, 20)), Decimal::ZERO); // Sunday
    }

    #[test]
    fn unconfigured_weekday_is_zero() {
        let mut ctx = context(false);
        ctx.week = WorkWeek::new(Vec::new());
        assert_eq!(ctx.day_credit(date(2025, 7, 15)), Decimal::ZERO);
    }

    #[test]
    fn public_holiday_is_zero() {
        // Labour Day 2025 falls on a Thursday.
        assert_eq!(context(false).day_credit(date(2025, 5, 1)), Decimal::ZERO);
    }

    #[test]
    fn recurring_off_day_is_zero() {
        let mut ctx = context(false);
        ctx.rules.push(weekly_monday_rule(date(2025, 1, 6)));
        assert_eq!(ctx.day_credit(date(2025, 1, 13)), Decimal::ZERO);
        assert_eq!(ctx.day_credit(date(2025, 1, 14)), FULL_DAY);
    }

    #[test]
    fn exemption_restores_the_day() {
        let mut ctx = context(false);
        let mut rule = weekly_monday_rule(date(2025, 1, 6));
        rule.exempt_dates.insert(date(2025, 1, 13));
        ctx.rules.push(rule);
        assert_eq!(ctx.day_credit(date(2025, 1, 13)), FULL_DAY);
        assert_eq!(ctx.day_credit(date(2025, 1, 20)), Decimal::ZERO);
    }

    #[test]
    fn exemption_round_trip_is_idempotent() {
        let mut ctx = context(false);
        ctx.rules.push(weekly_monday_rule(date(2025, 1, 6)));
        let before = ctx.day_credit(date(2025, 1, 13));

        ctx.rules[0].exempt_dates.insert(date(2025, 1, 13));
        assert_ne!(ctx.day_credit(date(2025, 1, 13)), before);

        ctx.rules[0].exempt_dates.remove(&date(2025, 1, 13));
        assert_eq!(ctx.day_credit(date(2025, 1, 13)), before);
    }

    #[test]
    fn non_vacation_absence_is_zero() {
        let mut ctx = context(false);
        ctx.other_absences.push((date(2025, 7, 14), date(2025, 7, 16)));
        assert_eq!(ctx.day_credit(date(2025, 7, 15)), Decimal::ZERO);
        assert_eq!(ctx.day_credit(date(2025, 7, 17)), FULL_DAY);
    }

    #[test]
    fn holiday_and_rule_on_the_same_date_still_zero() {
        // Whit Monday 2025-06-09 is a Monday and a public holiday.
        let mut ctx = context(false);
        ctx.rules.push(weekly_monday_rule(date(2025, 1, 6)));
        assert_eq!(ctx.day_credit(date(2025, 6, 9)), Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // Half-day holidays
    // -----------------------------------------------------------------------

    #[test]
    fn christmas_eve_is_half_with_the_flag() {
        // 2025-12-24 is a Wednesday.
        assert_eq!(context(true).day_credit(date(2025, 12, 24)), HALF_DAY);
    }

    #[test]
    fn christmas_eve_is_full_without_the_flag() {
        assert_eq!(context(false).day_credit(date(2025, 12, 24)), FULL_DAY);
    }

    #[test]
    fn christmas_day_is_zero_even_with_the_flag() {
        assert_eq!(context(true).day_credit(date(2025, 12, 25)), Decimal::ZERO);
        assert_eq!(context(true).day_credit(date(2025, 12, 26)), Decimal::ZERO);
    }

    #[test]
    fn new_years_eve_on_a_weekend_stays_zero() {
        // 2028-12-31 is a Sunday; the weekend check wins.
        assert_eq!(context(true).day_credit(date(2028, 12, 31)), Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // Range totals
    // -----------------------------------------------------------------------

    #[test]
    fn christmas_week_2025_with_half_days() {
        // Dec 23 full, Dec 24 half, Dec 25/26 holidays, Dec 27 Saturday.
        let total = context(true)
            .working_days_in_range(date(2025, 12, 23), date(2025, 12, 27))
            .unwrap();
        assert_eq!(total, dec!(1.5));
    }

    #[test]
    fn christmas_week_2025_without_half_days() {
        let total = context(false)
            .working_days_in_range(date(2025, 12, 23), date(2025, 12, 27))
            .unwrap();
        assert_eq!(total, dec!(2.0));
    }

    #[test]
    fn plain_working_week_totals_five() {
        let total = context(false)
            .working_days_in_range(date(2025, 7, 14), date(2025, 7, 20))
            .unwrap();
        assert_eq!(total, dec!(5));
    }

    #[test]
    fn totals_are_additive_over_adjacent_ranges() {
        let ctx = context(true);
        let whole = ctx
            .working_days_in_range(date(2025, 12, 1), date(2025, 12, 31))
            .unwrap();
        let first = ctx
            .working_days_in_range(date(2025, 12, 1), date(2025, 12, 15))
            .unwrap();
        let second = ctx
            .working_days_in_range(date(2025, 12, 16), date(2025, 12, 31))
            .unwrap();
        assert_eq!(whole, first + second);
    }

    #[test]
    fn single_day_range_equals_day_credit() {
        let ctx = context(false);
        let day = date(2025, 7, 15);
        assert_eq!(
            ctx.working_days_in_range(day, day).unwrap(),
            ctx.day_credit(day)
        );
    }

    #[test]
    fn inverted_range_is_a_validation_error() {
        let err = context(false)
            .working_days_in_range(date(2025, 7, 20), date(2025, 7, 14))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    // -----------------------------------------------------------------------
    // Effective hours
    // -----------------------------------------------------------------------

    #[test]
    fn hours_derived_from_start_and_end_times() {
        let schedule = WeekdaySchedule {
            weekday: Weekday::Mon,
            is_working_day: true,
            hours: dec!(8),
            start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time: Some(NaiveTime::from_hms_opt(17, 30, 0).unwrap()),
            break_minutes: 30,
        };
        assert_eq!(schedule.effective_hours(), dec!(8));
    }

    #[test]
    fn hours_fall_back_to_the_literal_value() {
        let schedule = WeekdaySchedule {
            weekday: Weekday::Tue,
            is_working_day: true,
            hours: dec!(6.5),
            start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time: None,
            break_minutes: 0,
        };
        assert_eq!(schedule.effective_hours(), dec!(6.5));
    }

    #[test]
    fn oversized_break_clamps_to_zero_hours() {
        let schedule = WeekdaySchedule {
            weekday: Weekday::Wed,
            is_working_day: true,
            hours: dec!(8),
            start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time: Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            break_minutes: 120,
        };
        assert_eq!(schedule.effective_hours(), Decimal::ZERO);
    }
}
