//! User rows, projected to the fields the calendar subsystem needs.

use serde::Serialize;
use sqlx::FromRow;
use timetrack_core::error::CoreError;
use timetrack_core::holidays::Region;
use timetrack_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// Account management (credentials, roles, profile) belongs to the host
/// application; only the calendar-relevant columns appear here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Wire value of [`Region`], e.g. `BERLIN`.
    pub state: String,
    pub half_day_holidays_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Decode the stored state into the holiday region.
    pub fn region(&self) -> Result<Region, CoreError> {
        self.state.parse()
    }
}
