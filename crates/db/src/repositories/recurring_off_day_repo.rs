//! Repository for the `recurring_off_days` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::recurring_off_day::{CreateRecurringOffDay, RecurringOffDay};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, recurrence_pattern, weekday, week_interval, \
                       reference_date, week_of_month, start_date, end_date, \
                       is_active, description, created_at, updated_at";

/// Provides data access for recurring off-day rules.
pub struct RecurringOffDayRepo;

impl RecurringOffDayRepo {
    /// Insert a new rule, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        dto: &CreateRecurringOffDay,
    ) -> Result<RecurringOffDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO recurring_off_days \
                 (user_id, recurrence_pattern, weekday, week_interval, reference_date, \
                  week_of_month, start_date, end_date, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecurringOffDay>(&query)
            .bind(user_id)
            .bind(&dto.recurrence_pattern)
            .bind(dto.weekday)
            .bind(dto.week_interval)
            .bind(dto.reference_date)
            .bind(dto.week_of_month)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(&dto.description)
            .fetch_one(pool)
            .await
    }

    /// Find a rule by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RecurringOffDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recurring_off_days WHERE id = $1");
        sqlx::query_as::<_, RecurringOffDay>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rules belonging to a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<RecurringOffDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_days \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, RecurringOffDay>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Active rules whose validity window contains `date`.
    pub async fn list_active_overlapping(
        pool: &PgPool,
        user_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<RecurringOffDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_days \
             WHERE user_id = $1 \
               AND is_active \
               AND start_date <= $2 \
               AND (end_date IS NULL OR end_date >= $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, RecurringOffDay>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Write back a rule after the service layer merged and revalidated
    /// its fields. Returns the stored row.
    pub async fn update(
        pool: &PgPool,
        rule: &RecurringOffDay,
    ) -> Result<Option<RecurringOffDay>, sqlx::Error> {
        let query = format!(
            "UPDATE recurring_off_days SET \
                 recurrence_pattern = $2, \
                 weekday            = $3, \
                 week_interval      = $4, \
                 reference_date     = $5, \
                 week_of_month      = $6, \
                 start_date         = $7, \
                 end_date           = $8, \
                 is_active          = $9, \
                 description        = $10, \
                 updated_at         = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecurringOffDay>(&query)
            .bind(rule.id)
            .bind(&rule.recurrence_pattern)
            .bind(rule.weekday)
            .bind(rule.week_interval)
            .bind(rule.reference_date)
            .bind(rule.week_of_month)
            .bind(rule.start_date)
            .bind(rule.end_date)
            .bind(rule.is_active)
            .bind(&rule.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule by ID; exemptions cascade in the database.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recurring_off_days WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
