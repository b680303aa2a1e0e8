//! Recurring off-day rules and the pure date evaluator.
//!
//! A rule claims dates on which its owner is not expected to work, beyond
//! ordinary weekends. The pattern payload is a tagged enum, so a rule can
//! never carry the wrong parameter set for its pattern kind. Exemptions
//! are deliberately not consulted here; callers decide how to combine the
//! raw pattern match with per-date exemptions.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Wire/database name of the weekly pattern.
pub const PATTERN_EVERY_NTH_WEEK: &str = "EVERY_NTH_WEEK";
/// Wire/database name of the monthly pattern.
pub const PATTERN_NTH_WEEKDAY_OF_MONTH: &str = "NTH_WEEKDAY_OF_MONTH";

/// Occurrence value meaning "last occurrence of the weekday in its month".
pub const LAST_OCCURRENCE_OF_MONTH: i16 = 5;

/// Recurrence pattern with its pattern-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrencePattern {
    /// Every `interval`-th week, counted from `reference`.
    EveryNthWeek { interval: u32, reference: NaiveDate },
    /// The `occurrence`-th occurrence of the weekday in each month;
    /// [`LAST_OCCURRENCE_OF_MONTH`] means the last occurrence.
    NthWeekdayOfMonth { occurrence: i16 },
}

impl RecurrencePattern {
    /// Assemble a pattern from the split column/DTO representation.
    ///
    /// This is the single validation point for pattern parameters: both
    /// request validation and row decoding go through it.
    pub fn from_parts(
        kind: &str,
        week_interval: Option<i32>,
        reference_date: Option<NaiveDate>,
        week_of_month: Option<i16>,
    ) -> Result<Self, CoreError> {
        match kind {
            PATTERN_EVERY_NTH_WEEK => {
                let interval = match week_interval {
                    Some(i) if i >= 1 => i as u32,
                    _ => {
                        return Err(CoreError::Validation(
                            "week_interval is required and must be at least 1".into(),
                        ))
                    }
                };
                let reference = reference_date.ok_or_else(|| {
                    CoreError::Validation(
                        "reference_date is required for the EVERY_NTH_WEEK pattern".into(),
                    )
                })?;
                Ok(Self::EveryNthWeek {
                    interval,
                    reference,
                })
            }
            PATTERN_NTH_WEEKDAY_OF_MONTH => match week_of_month {
                Some(occurrence) if (1..=LAST_OCCURRENCE_OF_MONTH).contains(&occurrence) => {
                    Ok(Self::NthWeekdayOfMonth { occurrence })
                }
                _ => Err(CoreError::Validation(
                    "week_of_month must be between 1 and 5".into(),
                )),
            },
            other => Err(CoreError::Validation(format!(
                "Unknown recurrence pattern: {other}"
            ))),
        }
    }

    /// Wire/database name of the pattern kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EveryNthWeek { .. } => PATTERN_EVERY_NTH_WEEK,
            Self::NthWeekdayOfMonth { .. } => PATTERN_NTH_WEEKDAY_OF_MONTH,
        }
    }
}

/// ISO weekday number (1=Monday .. 7=Sunday) to [`chrono::Weekday`].
pub fn weekday_from_iso(weekday: i16) -> Result<Weekday, CoreError> {
    match weekday {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        other => Err(CoreError::Validation(format!(
            "Weekday must be between 1 (Monday) and 7 (Sunday), got {other}"
        ))),
    }
}

/// [`chrono::Weekday`] to the ISO weekday number (1=Monday .. 7=Sunday).
pub fn weekday_to_iso(weekday: Weekday) -> i16 {
    weekday.number_from_monday() as i16
}

/// A recurring off-day rule, decoded and ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffDayRule {
    pub id: DbId,
    pub weekday: Weekday,
    pub pattern: RecurrencePattern,
    /// First day the rule is in force.
    pub start_date: NaiveDate,
    /// Last day the rule is in force; `None` means open-ended.
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl OffDayRule {
    /// Whether this rule's pattern claims `date`.
    ///
    /// Checks, in order: active flag, validity window, weekday, pattern.
    /// Exemptions are not consulted. Degenerate parameters that survive
    /// into a constructed value evaluate to `false` with a warning, so a
    /// single malformed rule cannot abort an aggregate calculation.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        if date < self.start_date {
            return false;
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        if date.weekday() != self.weekday {
            return false;
        }

        match self.pattern {
            RecurrencePattern::EveryNthWeek {
                interval,
                reference,
            } => self.matches_every_nth_week(date, interval, reference),
            RecurrencePattern::NthWeekdayOfMonth { occurrence } => {
                self.matches_nth_weekday_of_month(date, occurrence)
            }
        }
    }

    fn matches_every_nth_week(&self, date: NaiveDate, interval: u32, reference: NaiveDate) -> bool {
        if interval == 0 {
            tracing::warn!(
                rule_id = self.id,
                "recurring off-day has a zero week interval, treating as non-matching"
            );
            return false;
        }

        // Floor division: dates before the reference yield a negative week
        // index and never match, even within the same calendar week.
        let weeks = (date - reference).num_days().div_euclid(7);
        weeks >= 0 && weeks % i64::from(interval) == 0
    }

    fn matches_nth_weekday_of_month(&self, date: NaiveDate, occurrence: i16) -> bool {
        if !(1..=LAST_OCCURRENCE_OF_MONTH).contains(&occurrence) {
            tracing::warn!(
                rule_id = self.id,
                occurrence,
                "recurring off-day has an out-of-range occurrence, treating as non-matching"
            );
            return false;
        }

        if occurrence == LAST_OCCURRENCE_OF_MONTH {
            // Last occurrence: one more week falls into the next month.
            return (date + Duration::days(7)).month() != date.month();
        }

        // The first occurrence of any weekday lands on day 1..=7, so the
        // occurrence index follows from the day of month alone.
        let nth = (date.day() - 1) / 7 + 1;
        nth == occurrence as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn every_nth_week(interval: u32, reference: NaiveDate) -> OffDayRule {
        OffDayRule {
            id: 1,
            weekday: reference.weekday(),
            pattern: RecurrencePattern::EveryNthWeek {
                interval,
                reference,
            },
            start_date: date(2020, 1, 1),
            end_date: None,
            active: true,
        }
    }

    fn nth_weekday_of_month(weekday: Weekday, occurrence: i16) -> OffDayRule {
        OffDayRule {
            id: 2,
            weekday,
            pattern: RecurrencePattern::NthWeekdayOfMonth { occurrence },
            start_date: date(2020, 1, 1),
            end_date: None,
            active: true,
        }
    }

    // -----------------------------------------------------------------------
    // EveryNthWeek
    // -----------------------------------------------------------------------

    #[test]
    fn four_weekly_rule_matches_on_the_interval() {
        // Monday rule, reference 2025-01-06.
        let rule = every_nth_week(4, date(2025, 1, 6));
        assert!(rule.applies_to(date(2025, 1, 6)));
        assert!(rule.applies_to(date(2025, 2, 3))); // 4 weeks later
        assert!(rule.applies_to(date(2025, 3, 3))); // 8 weeks later
    }

    #[test]
    fn four_weekly_rule_rejects_off_interval_weeks() {
        let rule = every_nth_week(4, date(2025, 1, 6));
        assert!(!rule.applies_to(date(2025, 1, 13))); // 1 week later
        assert!(!rule.applies_to(date(2025, 1, 27))); // 3 weeks later
    }

    #[test]
    fn weekly_rule_matches_every_matching_weekday() {
        let rule = every_nth_week(1, date(2025, 1, 6));
        assert!(rule.applies_to(date(2025, 1, 6)));
        assert!(rule.applies_to(date(2025, 1, 13)));
        assert!(rule.applies_to(date(2025, 1, 20)));
    }

    #[test]
    fn dates_before_the_reference_never_match() {
        let rule = every_nth_week(4, date(2025, 1, 6));
        assert!(!rule.applies_to(date(2024, 12, 9))); // 4 weeks earlier
        assert!(!rule.applies_to(date(2024, 12, 30))); // 1 week earlier
    }

    #[test]
    fn matching_weekday_just_before_reference_does_not_match() {
        // Monday rule with a Thursday reference: the Monday three days
        // before the reference is week -1, not week 0.
        let mut rule = every_nth_week(2, date(2025, 1, 9));
        rule.weekday = Weekday::Mon;
        assert!(!rule.applies_to(date(2025, 1, 6)));
        // The Monday four days after the reference is week 0.
        assert!(rule.applies_to(date(2025, 1, 13)));
    }

    #[test]
    fn other_weekdays_never_match() {
        let rule = every_nth_week(4, date(2025, 1, 6));
        assert!(!rule.applies_to(date(2025, 2, 4))); // Tuesday after a matching Monday
    }

    #[test]
    fn zero_interval_is_skipped_defensively() {
        let rule = every_nth_week(0, date(2025, 1, 6));
        assert!(!rule.applies_to(date(2025, 1, 6)));
    }

    // -----------------------------------------------------------------------
    // NthWeekdayOfMonth
    // -----------------------------------------------------------------------

    #[test]
    fn fourth_tuesday_matches_only_the_fourth() {
        let rule = nth_weekday_of_month(Weekday::Tue, 4);
        assert!(rule.applies_to(date(2025, 1, 28)));
        assert!(!rule.applies_to(date(2025, 1, 21))); // third Tuesday
        assert!(!rule.applies_to(date(2025, 2, 4))); // first Tuesday
    }

    #[test]
    fn first_monday_matches_in_consecutive_months() {
        let rule = nth_weekday_of_month(Weekday::Mon, 1);
        assert!(rule.applies_to(date(2025, 3, 3)));
        assert!(rule.applies_to(date(2025, 4, 7)));
        assert!(!rule.applies_to(date(2025, 4, 14)));
    }

    #[test]
    fn occurrence_five_means_last_occurrence() {
        let rule = nth_weekday_of_month(Weekday::Fri, LAST_OCCURRENCE_OF_MONTH);
        // May 2025 has five Fridays; only the 30th is the last.
        assert!(rule.applies_to(date(2025, 5, 30)));
        assert!(!rule.applies_to(date(2025, 5, 23)));
        // April 2025 has four Fridays; the fourth is also the last.
        assert!(rule.applies_to(date(2025, 4, 25)));
    }

    #[test]
    fn last_occurrence_works_across_the_year_boundary() {
        let rule = nth_weekday_of_month(Weekday::Wed, LAST_OCCURRENCE_OF_MONTH);
        assert!(rule.applies_to(date(2025, 12, 31)));
        assert!(!rule.applies_to(date(2025, 12, 24)));
    }

    #[test]
    fn out_of_range_occurrence_is_skipped_defensively() {
        let rule = nth_weekday_of_month(Weekday::Tue, 6);
        assert!(!rule.applies_to(date(2025, 1, 28)));
    }

    // -----------------------------------------------------------------------
    // Shared short-circuit checks
    // -----------------------------------------------------------------------

    #[test]
    fn inactive_rules_never_match() {
        let mut rule = every_nth_week(1, date(2025, 1, 6));
        rule.active = false;
        assert!(!rule.applies_to(date(2025, 1, 6)));
    }

    #[test]
    fn dates_outside_the_validity_window_never_match() {
        let mut rule = every_nth_week(1, date(2025, 1, 6));
        rule.start_date = date(2025, 1, 1);
        rule.end_date = Some(date(2025, 1, 31));
        assert!(rule.applies_to(date(2025, 1, 27)));
        assert!(!rule.applies_to(date(2025, 2, 3)));
        rule.start_date = date(2025, 1, 10);
        assert!(!rule.applies_to(date(2025, 1, 6)));
    }

    // -----------------------------------------------------------------------
    // from_parts
    // -----------------------------------------------------------------------

    #[test]
    fn from_parts_builds_the_weekly_pattern() {
        let pattern = RecurrencePattern::from_parts(
            PATTERN_EVERY_NTH_WEEK,
            Some(4),
            Some(date(2025, 1, 6)),
            None,
        )
        .unwrap();
        assert_eq!(
            pattern,
            RecurrencePattern::EveryNthWeek {
                interval: 4,
                reference: date(2025, 1, 6),
            }
        );
        assert_eq!(pattern.kind(), PATTERN_EVERY_NTH_WEEK);
    }

    #[test]
    fn from_parts_builds_the_monthly_pattern() {
        let pattern =
            RecurrencePattern::from_parts(PATTERN_NTH_WEEKDAY_OF_MONTH, None, None, Some(5))
                .unwrap();
        assert_eq!(pattern, RecurrencePattern::NthWeekdayOfMonth { occurrence: 5 });
    }

    #[test]
    fn from_parts_rejects_missing_weekly_parameters() {
        let err =
            RecurrencePattern::from_parts(PATTERN_EVERY_NTH_WEEK, None, Some(date(2025, 1, 6)), None)
                .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));

        let err = RecurrencePattern::from_parts(PATTERN_EVERY_NTH_WEEK, Some(4), None, None)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn from_parts_rejects_a_zero_interval() {
        let err = RecurrencePattern::from_parts(
            PATTERN_EVERY_NTH_WEEK,
            Some(0),
            Some(date(2025, 1, 6)),
            None,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn from_parts_rejects_out_of_range_occurrences() {
        for occurrence in [0, 6] {
            let err = RecurrencePattern::from_parts(
                PATTERN_NTH_WEEKDAY_OF_MONTH,
                None,
                None,
                Some(occurrence),
            )
            .unwrap_err();
            assert_matches!(err, CoreError::Validation(_));
        }
    }

    #[test]
    fn from_parts_rejects_unknown_kinds() {
        let err = RecurrencePattern::from_parts("EVERY_FULL_MOON", None, None, None).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    // -----------------------------------------------------------------------
    // Weekday conversion
    // -----------------------------------------------------------------------

    #[test]
    fn iso_weekdays_round_trip() {
        for iso in 1..=7i16 {
            assert_eq!(weekday_to_iso(weekday_from_iso(iso).unwrap()), iso);
        }
    }

    #[test]
    fn out_of_range_weekdays_are_rejected() {
        for iso in [0, 8] {
            assert_matches!(weekday_from_iso(iso), Err(CoreError::Validation(_)));
        }
    }
}
