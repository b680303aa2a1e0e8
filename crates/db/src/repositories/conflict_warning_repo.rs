//! Repository for the `recurring_off_day_conflict_warnings` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::conflict_warning::{ConflictWarning, NewConflictWarning};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, conflict_date, time_entry_id, recurring_off_day_id, \
                       acknowledged, acknowledged_at, created_at, updated_at";

/// Provides data access for conflict warnings.
pub struct ConflictWarningRepo;

impl ConflictWarningRepo {
    /// Insert a new warning in the unacknowledged state.
    pub async fn create(
        pool: &PgPool,
        input: &NewConflictWarning,
    ) -> Result<ConflictWarning, sqlx::Error> {
        let query = format!(
            "INSERT INTO recurring_off_day_conflict_warnings \
                 (user_id, conflict_date, time_entry_id, recurring_off_day_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(input.user_id)
            .bind(input.conflict_date)
            .bind(input.time_entry_id)
            .bind(input.recurring_off_day_id)
            .fetch_one(pool)
            .await
    }

    /// Find a warning by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ConflictWarning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_day_conflict_warnings WHERE id = $1"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The warning for (user, date), if any. At most one exists.
    pub async fn find_by_user_and_date(
        pool: &PgPool,
        user_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<ConflictWarning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_day_conflict_warnings \
             WHERE user_id = $1 AND conflict_date = $2"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Warnings created for a specific work entry.
    pub async fn list_by_entry(
        pool: &PgPool,
        time_entry_id: DbId,
    ) -> Result<Vec<ConflictWarning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_day_conflict_warnings \
             WHERE time_entry_id = $1 ORDER BY conflict_date"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(time_entry_id)
            .fetch_all(pool)
            .await
    }

    /// All warnings for a user, newest conflict first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ConflictWarning>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_day_conflict_warnings \
             WHERE user_id = $1 ORDER BY conflict_date DESC"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Flip a warning to acknowledged, stamping the time.
    ///
    /// The transition is one-way; re-acknowledging keeps the original
    /// timestamp.
    pub async fn acknowledge(pool: &PgPool, id: DbId) -> Result<Option<ConflictWarning>, sqlx::Error> {
        let query = format!(
            "UPDATE recurring_off_day_conflict_warnings SET \
                 acknowledged    = TRUE, \
                 acknowledged_at = COALESCE(acknowledged_at, NOW()), \
                 updated_at      = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConflictWarning>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete all warnings created for a work entry.
    ///
    /// Returns the number of rows deleted; zero is not an error, so the
    /// cleanup stays idempotent.
    pub async fn delete_by_entry(pool: &PgPool, time_entry_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM recurring_off_day_conflict_warnings WHERE time_entry_id = $1",
        )
        .bind(time_entry_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
