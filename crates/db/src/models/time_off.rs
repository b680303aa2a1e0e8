//! Time-off (absence period) models and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::error::CoreError;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

/// Absence category. Only `Vacation` is charged against the vacation
/// balance; the others exclude days from vacation accounting instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOffKind {
    Vacation,
    Sick,
    Personal,
    Other,
}

impl TimeOffKind {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vacation => "VACATION",
            Self::Sick => "SICK",
            Self::Personal => "PERSONAL",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for TimeOffKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VACATION" => Ok(Self::Vacation),
            "SICK" => Ok(Self::Sick),
            "PERSONAL" => Ok(Self::Personal),
            "OTHER" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown time-off type: {other}"
            ))),
        }
    }
}

/// A row from the `time_off` table. Both dates are inclusive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeOff {
    pub id: DbId,
    pub user_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Wire value of [`TimeOffKind`].
    pub time_off_type: String,
    /// Optional override; when absent the weekday's configured hours apply.
    pub hours_per_day: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimeOff {
    pub fn kind(&self) -> Result<TimeOffKind, CoreError> {
        self.time_off_type.parse()
    }

    /// Whether this period counts against the vacation balance.
    ///
    /// Unknown type strings are treated as non-vacation: they still block
    /// the day, but are never charged as vacation.
    pub fn is_vacation(&self) -> bool {
        matches!(self.kind(), Ok(TimeOffKind::Vacation))
    }
}

/// DTO for creating a time-off entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimeOff {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_off_type: TimeOffKind,
    pub hours_per_day: Option<Decimal>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO for updating a time-off entry; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTimeOff {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub time_off_type: Option<TimeOffKind>,
    pub hours_per_day: Option<Option<Decimal>>,
    pub notes: Option<Option<String>>,
}
