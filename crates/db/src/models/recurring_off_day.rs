//! Recurring off-day rule models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::error::CoreError;
use timetrack_core::recurrence::{weekday_from_iso, OffDayRule, RecurrencePattern};
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `recurring_off_days` table.
///
/// The pattern parameters are split across nullable columns; decoding
/// into the tagged [`RecurrencePattern`] happens in [`Self::to_rule`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecurringOffDay {
    pub id: DbId,
    pub user_id: DbId,
    /// Pattern kind, e.g. `EVERY_NTH_WEEK`.
    pub recurrence_pattern: String,
    /// ISO weekday, 1=Monday .. 7=Sunday.
    pub weekday: i16,
    pub week_interval: Option<i32>,
    pub reference_date: Option<NaiveDate>,
    pub week_of_month: Option<i16>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RecurringOffDay {
    /// Decode into the evaluator's rule type.
    ///
    /// Fails with a `Validation` error when the stored parameters do not
    /// form a coherent pattern; aggregate callers downgrade that to
    /// warn-and-skip so one malformed row cannot abort a calculation.
    pub fn to_rule(&self) -> Result<OffDayRule, CoreError> {
        Ok(OffDayRule {
            id: self.id,
            weekday: weekday_from_iso(self.weekday)?,
            pattern: RecurrencePattern::from_parts(
                &self.recurrence_pattern,
                self.week_interval,
                self.reference_date,
                self.week_of_month,
            )?,
            start_date: self.start_date,
            end_date: self.end_date,
            active: self.is_active,
        })
    }
}

/// DTO for creating a recurring off-day rule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecurringOffDay {
    pub recurrence_pattern: String,
    #[validate(range(min = 1, max = 7))]
    pub weekday: i16,
    #[validate(range(min = 1))]
    pub week_interval: Option<i32>,
    pub reference_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5))]
    pub week_of_month: Option<i16>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// DTO for updating a recurring off-day rule; absent fields keep their
/// current value. The merged result is revalidated before writing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateRecurringOffDay {
    pub recurrence_pattern: Option<String>,
    #[validate(range(min = 1, max = 7))]
    pub weekday: Option<i16>,
    #[validate(range(min = 1))]
    pub week_interval: Option<i32>,
    pub reference_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5))]
    pub week_of_month: Option<i16>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
    pub description: Option<Option<String>>,
}
