//! Repository for the `working_hours` table.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::working_hours::{UpsertWorkingHours, WorkingHours};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, weekday, hours, is_working_day, \
                       start_time, end_time, break_minutes, created_at, updated_at";

/// Provides data access for per-weekday working-hours configuration.
pub struct WorkingHoursRepo;

impl WorkingHoursRepo {
    /// All configured weekdays for a user, ordered Monday to Sunday.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<WorkingHours>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM working_hours \
             WHERE user_id = $1 ORDER BY weekday"
        );
        sqlx::query_as::<_, WorkingHours>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the configuration for one weekday.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        dto: &UpsertWorkingHours,
    ) -> Result<WorkingHours, sqlx::Error> {
        let query = format!(
            "INSERT INTO working_hours \
                 (user_id, weekday, hours, is_working_day, start_time, end_time, break_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, weekday) DO UPDATE SET \
                 hours          = EXCLUDED.hours, \
                 is_working_day = EXCLUDED.is_working_day, \
                 start_time     = EXCLUDED.start_time, \
                 end_time       = EXCLUDED.end_time, \
                 break_minutes  = EXCLUDED.break_minutes, \
                 updated_at     = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkingHours>(&query)
            .bind(user_id)
            .bind(dto.weekday)
            .bind(dto.hours)
            .bind(dto.is_working_day)
            .bind(dto.start_time)
            .bind(dto.end_time)
            .bind(dto.break_minutes)
            .fetch_one(pool)
            .await
    }
}
