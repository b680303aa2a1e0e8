//! Repository for the `time_off` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::time_off::{CreateTimeOff, TimeOff, TimeOffKind};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, start_date, end_date, time_off_type, \
                       hours_per_day, notes, created_at, updated_at";

/// Provides data access for time-off entries.
pub struct TimeOffRepo;

impl TimeOffRepo {
    /// Insert a new time-off entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        dto: &CreateTimeOff,
    ) -> Result<TimeOff, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_off \
                 (user_id, start_date, end_date, time_off_type, hours_per_day, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeOff>(&query)
            .bind(user_id)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(dto.time_off_type.as_str())
            .bind(dto.hours_per_day)
            .bind(&dto.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TimeOff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_off WHERE id = $1");
        sqlx::query_as::<_, TimeOff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All entries of a user overlapping the inclusive range.
    pub async fn list_overlapping(
        pool: &PgPool,
        user_id: DbId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeOff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_off \
             WHERE user_id = $1 AND start_date <= $3 AND end_date >= $2 \
             ORDER BY start_date"
        );
        sqlx::query_as::<_, TimeOff>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Entries of one type overlapping the inclusive range.
    pub async fn list_overlapping_of_kind(
        pool: &PgPool,
        user_id: DbId,
        kind: TimeOffKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeOff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_off \
             WHERE user_id = $1 AND time_off_type = $2 \
               AND start_date <= $4 AND end_date >= $3 \
             ORDER BY start_date"
        );
        sqlx::query_as::<_, TimeOff>(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Write back an entry after the service layer merged and revalidated
    /// its fields. Returns the stored row.
    pub async fn update(pool: &PgPool, entry: &TimeOff) -> Result<Option<TimeOff>, sqlx::Error> {
        let query = format!(
            "UPDATE time_off SET \
                 start_date    = $2, \
                 end_date      = $3, \
                 time_off_type = $4, \
                 hours_per_day = $5, \
                 notes         = $6, \
                 updated_at    = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeOff>(&query)
            .bind(entry.id)
            .bind(entry.start_date)
            .bind(entry.end_date)
            .bind(&entry.time_off_type)
            .bind(entry.hours_per_day)
            .bind(&entry.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM time_off WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
