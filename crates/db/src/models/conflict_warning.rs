//! Conflict warning models.
//!
//! A warning records that a work entry was saved on a date an active
//! recurring off-day claims. Warnings persist after acknowledgement so
//! calendars can keep highlighting the date.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};

/// A row from the `recurring_off_day_conflict_warnings` table.
///
/// `time_entry_id` and `recurring_off_day_id` are plain values, not
/// foreign keys: the warning outlives the deletion of either.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConflictWarning {
    pub id: DbId,
    pub user_id: DbId,
    pub conflict_date: NaiveDate,
    pub time_entry_id: DbId,
    pub recurring_off_day_id: DbId,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a freshly detected conflict.
#[derive(Debug, Clone)]
pub struct NewConflictWarning {
    pub user_id: DbId,
    pub conflict_date: NaiveDate,
    pub time_entry_id: DbId,
    pub recurring_off_day_id: DbId,
}
