//! Work entry projection consumed by conflict detection.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use timetrack_core::types::DbId;

/// A recorded work entry, as handed to the conflict detector.
///
/// The entry store itself belongs to the host application; this struct
/// carries just the fields detection needs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub entry_date: NaiveDate,
}
