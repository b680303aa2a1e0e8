//! Use cases for per-weekday working-hours configuration.

use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::working_hours::{UpsertWorkingHours, WorkingHours};
use timetrack_db::repositories::{UserRepo, WorkingHoursRepo};
use validator::Validate;

use crate::error::ServiceResult;

/// Manages a user's seven-day working-hours configuration.
pub struct WorkingHoursService;

impl WorkingHoursService {
    /// All configured weekdays for a user, Monday first.
    pub async fn get_week(pool: &PgPool, user_id: DbId) -> ServiceResult<Vec<WorkingHours>> {
        Ok(WorkingHoursRepo::find_by_user(pool, user_id).await?)
    }

    /// Insert or replace the configuration for one weekday.
    pub async fn configure_weekday(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertWorkingHours,
    ) -> ServiceResult<WorkingHours> {
        input.validate()?;
        validate_times(input)?;

        UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;

        let stored = WorkingHoursRepo::upsert(pool, user_id, input).await?;
        tracing::info!(user_id, weekday = stored.weekday, "Configured working hours");
        Ok(stored)
    }
}

fn validate_times(input: &UpsertWorkingHours) -> Result<(), CoreError> {
    if input.hours < rust_decimal::Decimal::ZERO {
        return Err(CoreError::Validation("Hours must not be negative".into()));
    }
    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if end <= start {
            return Err(CoreError::Validation(
                "End time must be after the start time".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn input() -> UpsertWorkingHours {
        UpsertWorkingHours {
            weekday: 1,
            hours: dec!(8),
            is_working_day: true,
            start_time: None,
            end_time: None,
            break_minutes: 0,
        }
    }

    #[test]
    fn plain_hours_pass() {
        assert!(validate_times(&input()).is_ok());
    }

    #[test]
    fn negative_hours_are_rejected() {
        let mut bad = input();
        bad.hours = dec!(-1);
        assert_matches!(validate_times(&bad), Err(CoreError::Validation(_)));
    }

    #[test]
    fn end_time_before_start_time_is_rejected() {
        let mut bad = input();
        bad.start_time = NaiveTime::from_hms_opt(17, 0, 0);
        bad.end_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert_matches!(validate_times(&bad), Err(CoreError::Validation(_)));
    }
}
