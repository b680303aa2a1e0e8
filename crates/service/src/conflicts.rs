//! Conflict detection between work entries and recurring off-days.
//!
//! Per (user, date) a warning moves through none → warned → acknowledged;
//! the only way back is deletion of the originating work entry.

use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::conflict_warning::{ConflictWarning, NewConflictWarning};
use timetrack_db::models::work_entry::WorkEntry;
use timetrack_db::repositories::{ConflictWarningRepo, ExemptionRepo, RecurringOffDayRepo};

use crate::error::ServiceResult;

/// Detects and manages conflicts between work entries and off-day rules.
pub struct ConflictService;

impl ConflictService {
    /// Check a persisted work entry against the user's active rules and
    /// create a warning if its date is claimed by one.
    ///
    /// Idempotent per (user, date): an existing warning is returned
    /// unchanged. An exempted date is a regular working day and must not
    /// warn.
    pub async fn detect_warning(
        pool: &PgPool,
        entry: &WorkEntry,
    ) -> ServiceResult<Option<ConflictWarning>> {
        if let Some(existing) =
            ConflictWarningRepo::find_by_user_and_date(pool, entry.user_id, entry.entry_date)
                .await?
        {
            tracing::debug!(
                user_id = entry.user_id,
                date = %entry.entry_date,
                "Warning already exists for this date"
            );
            return Ok(Some(existing));
        }

        let candidates =
            RecurringOffDayRepo::list_active_overlapping(pool, entry.user_id, entry.entry_date)
                .await?;

        for row in candidates {
            let rule = match row.to_rule() {
                Ok(rule) => rule,
                Err(err) => {
                    tracing::warn!(
                        rule_id = row.id,
                        error = %err,
                        "skipping malformed recurring off-day during conflict detection"
                    );
                    continue;
                }
            };
            if !rule.applies_to(entry.entry_date) {
                continue;
            }
            if ExemptionRepo::exists(pool, row.id, entry.entry_date).await? {
                continue;
            }

            tracing::info!(
                user_id = entry.user_id,
                rule_id = row.id,
                entry_id = entry.id,
                date = %entry.entry_date,
                "Work entry conflicts with recurring off-day"
            );
            let warning = ConflictWarningRepo::create(
                pool,
                &NewConflictWarning {
                    user_id: entry.user_id,
                    conflict_date: entry.entry_date,
                    time_entry_id: entry.id,
                    recurring_off_day_id: row.id,
                },
            )
            .await?;
            return Ok(Some(warning));
        }

        Ok(None)
    }

    /// Re-run detection for a batch of entries, e.g. after a rule change.
    pub async fn reevaluate(pool: &PgPool, entries: &[WorkEntry]) -> ServiceResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        tracing::info!(count = entries.len(), "Re-evaluating work entries for conflicts");
        for entry in entries {
            Self::detect_warning(pool, entry).await?;
        }
        Ok(())
    }

    /// Acknowledge a warning. One-way; the warning stays persisted so
    /// calendars can keep highlighting the date.
    pub async fn acknowledge(
        pool: &PgPool,
        user_id: DbId,
        warning_id: DbId,
    ) -> ServiceResult<ConflictWarning> {
        let warning = ConflictWarningRepo::find_by_id(pool, warning_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "conflict warning",
                id: warning_id,
            })?;
        if warning.user_id != user_id {
            return Err(
                CoreError::Forbidden("Conflict warning belongs to a different user".into()).into(),
            );
        }

        let acknowledged = ConflictWarningRepo::acknowledge(pool, warning_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "conflict warning",
                id: warning_id,
            })?;
        tracing::info!(user_id, warning_id, "Conflict warning acknowledged");
        Ok(acknowledged)
    }

    /// All warnings of a user.
    pub async fn list(pool: &PgPool, user_id: DbId) -> ServiceResult<Vec<ConflictWarning>> {
        Ok(ConflictWarningRepo::list_by_user(pool, user_id).await?)
    }

    /// Remove warnings created for a deleted work entry.
    ///
    /// Idempotent: deleting zero rows is not an error.
    pub async fn cleanup_for_entry(pool: &PgPool, time_entry_id: DbId) -> ServiceResult<u64> {
        let deleted = ConflictWarningRepo::delete_by_entry(pool, time_entry_id).await?;
        tracing::debug!(time_entry_id, deleted, "Cleaned up conflict warnings for work entry");
        Ok(deleted)
    }
}
