//! Use cases for recurring off-day rules.

use chrono::NaiveDate;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::recurrence::{weekday_from_iso, RecurrencePattern};
use timetrack_core::types::DbId;
use timetrack_db::models::recurring_off_day::{
    CreateRecurringOffDay, RecurringOffDay, UpdateRecurringOffDay,
};
use timetrack_db::repositories::{RecurringOffDayRepo, UserRepo};
use validator::Validate;

use crate::error::ServiceResult;

/// CRUD over recurring off-day rules with ownership enforcement.
pub struct RecurringOffDayService;

impl RecurringOffDayService {
    /// Create a rule after validating its pattern configuration.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateRecurringOffDay,
    ) -> ServiceResult<RecurringOffDay> {
        input.validate()?;
        validate_rule_shape(
            &input.recurrence_pattern,
            input.weekday,
            input.week_interval,
            input.reference_date,
            input.week_of_month,
            input.start_date,
            input.end_date,
        )?;

        UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let created = RecurringOffDayRepo::create(pool, user_id, input).await?;
        tracing::info!(user_id, rule_id = created.id, "Created recurring off-day");
        Ok(created)
    }

    /// Fetch a rule the user owns.
    pub async fn get(pool: &PgPool, user_id: DbId, id: DbId) -> ServiceResult<RecurringOffDay> {
        owned_rule(pool, user_id, id).await
    }

    /// All rules of a user.
    pub async fn list(pool: &PgPool, user_id: DbId) -> ServiceResult<Vec<RecurringOffDay>> {
        Ok(RecurringOffDayRepo::list_by_user(pool, user_id).await?)
    }

    /// Update any subset of a rule's fields.
    ///
    /// The merged result is revalidated as a whole, so a patch can never
    /// leave a rule with an incoherent pattern configuration.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateRecurringOffDay,
    ) -> ServiceResult<RecurringOffDay> {
        input.validate()?;
        let mut rule = owned_rule(pool, user_id, id).await?;

        if let Some(pattern) = &input.recurrence_pattern {
            rule.recurrence_pattern = pattern.clone();
        }
        if let Some(weekday) = input.weekday {
            rule.weekday = weekday;
        }
        if let Some(interval) = input.week_interval {
            rule.week_interval = Some(interval);
        }
        if let Some(reference) = input.reference_date {
            rule.reference_date = Some(reference);
        }
        if let Some(occurrence) = input.week_of_month {
            rule.week_of_month = Some(occurrence);
        }
        if let Some(start) = input.start_date {
            rule.start_date = start;
        }
        if let Some(end) = input.end_date {
            rule.end_date = end;
        }
        if let Some(active) = input.is_active {
            rule.is_active = active;
        }
        if let Some(description) = &input.description {
            rule.description = description.clone();
        }

        validate_rule_shape(
            &rule.recurrence_pattern,
            rule.weekday,
            rule.week_interval,
            rule.reference_date,
            rule.week_of_month,
            rule.start_date,
            rule.end_date,
        )?;

        let updated = RecurringOffDayRepo::update(pool, &rule)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "recurring off-day",
                id,
            })?;
        tracing::info!(user_id, rule_id = id, "Updated recurring off-day");
        Ok(updated)
    }

    /// Delete a rule the user owns; its exemptions cascade away with it.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> ServiceResult<()> {
        let rule = owned_rule(pool, user_id, id).await?;
        RecurringOffDayRepo::delete(pool, rule.id).await?;
        tracing::info!(user_id, rule_id = id, "Deleted recurring off-day");
        Ok(())
    }
}

/// Load a rule and verify it belongs to `user_id`.
pub(crate) async fn owned_rule(
    pool: &PgPool,
    user_id: DbId,
    id: DbId,
) -> ServiceResult<RecurringOffDay> {
    let rule = RecurringOffDayRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "recurring off-day",
            id,
        })?;
    if rule.user_id != user_id {
        return Err(CoreError::Forbidden(
            "Recurring off-day belongs to a different user".into(),
        )
        .into());
    }
    Ok(rule)
}

/// Cross-field validation of a rule's configuration.
fn validate_rule_shape(
    pattern: &str,
    weekday: i16,
    week_interval: Option<i32>,
    reference_date: Option<NaiveDate>,
    week_of_month: Option<i16>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    weekday_from_iso(weekday)?;
    RecurrencePattern::from_parts(pattern, week_interval, reference_date, week_of_month)?;
    if let Some(end) = end_date {
        if end < start_date {
            return Err(CoreError::Validation(
                "End date must not be before the start date".into(),
            ));
        }
    }
    Ok(())
}
