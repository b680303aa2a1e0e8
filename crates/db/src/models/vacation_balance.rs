//! Vacation balance models and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `vacation_balance` table (one per user per year).
///
/// `used_days` and `planned_days` are derived from vacation time-off
/// entries by the ledger; `remaining_days` is always recomputed from its
/// inputs in the same statement that writes them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VacationBalance {
    pub id: DbId,
    pub user_id: DbId,
    pub year: i32,
    pub annual_allowance_days: Decimal,
    pub carried_over_days: Decimal,
    pub adjustment_days: Decimal,
    pub used_days: Decimal,
    pub planned_days: Decimal,
    pub remaining_days: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adjusting the manually managed entitlement fields.
///
/// Decimal bounds (non-negative allowance) are checked in the service
/// layer, where the merged value is known.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateVacationBalance {
    pub annual_allowance_days: Option<Decimal>,
    pub carried_over_days: Option<Decimal>,
    pub adjustment_days: Option<Decimal>,
}
