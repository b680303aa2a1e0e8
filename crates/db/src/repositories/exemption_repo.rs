//! Repository for the `recurring_off_day_exemptions` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::exemption::{CreateExemption, OffDayExemption};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, recurring_off_day_id, exemption_date, reason, created_at";

/// Provides data access for off-day exemptions.
pub struct ExemptionRepo;

impl ExemptionRepo {
    /// Insert a new exemption, returning the created row.
    pub async fn create(
        pool: &PgPool,
        rule_id: DbId,
        dto: &CreateExemption,
    ) -> Result<OffDayExemption, sqlx::Error> {
        let query = format!(
            "INSERT INTO recurring_off_day_exemptions \
                 (recurring_off_day_id, exemption_date, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OffDayExemption>(&query)
            .bind(rule_id)
            .bind(dto.exemption_date)
            .bind(&dto.reason)
            .fetch_one(pool)
            .await
    }

    /// Find an exemption by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OffDayExemption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recurring_off_day_exemptions WHERE id = $1");
        sqlx::query_as::<_, OffDayExemption>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an exemption exists for (rule, date).
    pub async fn exists(pool: &PgPool, rule_id: DbId, date: NaiveDate) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                 SELECT 1 FROM recurring_off_day_exemptions \
                 WHERE recurring_off_day_id = $1 AND exemption_date = $2)",
        )
        .bind(rule_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    /// All exemptions of a rule, oldest date first.
    pub async fn list_by_rule(pool: &PgPool, rule_id: DbId) -> Result<Vec<OffDayExemption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_off_day_exemptions \
             WHERE recurring_off_day_id = $1 ORDER BY exemption_date"
        );
        sqlx::query_as::<_, OffDayExemption>(&query)
            .bind(rule_id)
            .fetch_all(pool)
            .await
    }

    /// Just the exempted dates of a rule, for calendar-context building.
    pub async fn dates_for_rule(pool: &PgPool, rule_id: DbId) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT exemption_date FROM recurring_off_day_exemptions \
             WHERE recurring_off_day_id = $1",
        )
        .bind(rule_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an exemption by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recurring_off_day_exemptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
