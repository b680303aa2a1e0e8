//! Use cases for off-day exemptions.

use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;
use timetrack_db::models::exemption::{CreateExemption, OffDayExemption};
use timetrack_db::repositories::ExemptionRepo;
use validator::Validate;

use crate::error::ServiceResult;
use crate::recurring_off_days::owned_rule;

/// CRUD over exemptions, scoped through the owning rule.
pub struct ExemptionService;

impl ExemptionService {
    /// Create an exemption for one date of a rule.
    ///
    /// The date must be one the rule's pattern actually claims; an
    /// exemption for a date the rule would not match is meaningless and
    /// rejected. A duplicate date surfaces as `Conflict`, distinct from
    /// validation failures.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        rule_id: DbId,
        input: &CreateExemption,
    ) -> ServiceResult<OffDayExemption> {
        input.validate()?;
        let row = owned_rule(pool, user_id, rule_id).await?;
        let rule = row.to_rule()?;

        if !rule.applies_to(input.exemption_date) {
            return Err(CoreError::Validation(format!(
                "Date {} does not match the recurring off-day pattern",
                input.exemption_date
            ))
            .into());
        }

        if ExemptionRepo::exists(pool, rule_id, input.exemption_date).await? {
            return Err(CoreError::Conflict(format!(
                "Exemption already exists for date {}",
                input.exemption_date
            ))
            .into());
        }

        let created = ExemptionRepo::create(pool, rule_id, input).await?;
        tracing::info!(
            rule_id,
            exemption_id = created.id,
            date = %created.exemption_date,
            "Created off-day exemption"
        );
        Ok(created)
    }

    /// All exemptions of a rule the user owns.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        rule_id: DbId,
    ) -> ServiceResult<Vec<OffDayExemption>> {
        owned_rule(pool, user_id, rule_id).await?;
        Ok(ExemptionRepo::list_by_rule(pool, rule_id).await?)
    }

    /// Delete an exemption, restoring the rule on that date.
    pub async fn delete(pool: &PgPool, user_id: DbId, exemption_id: DbId) -> ServiceResult<()> {
        let exemption = ExemptionRepo::find_by_id(pool, exemption_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "exemption",
                id: exemption_id,
            })?;
        owned_rule(pool, user_id, exemption.recurring_off_day_id).await?;

        ExemptionRepo::delete(pool, exemption.id).await?;
        tracing::info!(
            rule_id = exemption.recurring_off_day_id,
            exemption_id,
            "Deleted off-day exemption"
        );
        Ok(())
    }
}
