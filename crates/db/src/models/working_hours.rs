//! Per-weekday working-hours configuration models and DTOs.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::error::CoreError;
use timetrack_core::recurrence::weekday_from_iso;
use timetrack_core::types::{DbId, Timestamp};
use timetrack_core::working_days::WeekdaySchedule;
use validator::Validate;

/// A row from the `working_hours` table (one per user per weekday).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkingHours {
    pub id: DbId,
    pub user_id: DbId,
    /// ISO weekday, 1=Monday .. 7=Sunday.
    pub weekday: i16,
    pub hours: Decimal,
    pub is_working_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkingHours {
    /// Decode into the classifier's schedule type.
    pub fn to_schedule(&self) -> Result<WeekdaySchedule, CoreError> {
        Ok(WeekdaySchedule {
            weekday: weekday_from_iso(self.weekday)?,
            is_working_day: self.is_working_day,
            hours: self.hours,
            start_time: self.start_time,
            end_time: self.end_time,
            break_minutes: self.break_minutes,
        })
    }
}

/// DTO for setting one weekday's configuration (insert-or-update).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertWorkingHours {
    #[validate(range(min = 1, max = 7))]
    pub weekday: i16,
    pub hours: Decimal,
    pub is_working_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(range(min = 0))]
    pub break_minutes: i32,
}
