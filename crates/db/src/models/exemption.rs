//! Off-day exemption models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `recurring_off_day_exemptions` table.
///
/// An exemption suspends its rule for exactly one date, turning that
/// date back into a regular working day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OffDayExemption {
    pub id: DbId,
    pub recurring_off_day_id: DbId,
    pub exemption_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating an exemption.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExemption {
    pub exemption_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}
