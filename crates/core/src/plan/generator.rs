//! Ideal schedule generation.

use pennyplan_shared::config::PlanDefaults;
use pennyplan_shared::types::Money;
use serde_json::Value;

use super::types::{PlanConfig, PlanScheduleEntry};
use super::weights::curve_weights;
use crate::allocation::AllocationUtil;
use crate::error::{EngineError, EngineResult};

/// Longest plan accepted, in months (100 years).
pub const MAX_MONTHS: u32 = 1200;

/// Turns a goal and a duration into a month-by-month target schedule.
pub struct PlanGenerator;

impl PlanGenerator {
    /// Generates the ideal schedule for `goal_amount` over `months`.
    ///
    /// The goal is split along the plan type's weighting curve: every month
    /// gets the floor of its exact share, then leftover units go one at a
    /// time to the latest months first. The targets always sum to
    /// `goal_amount` exactly.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if `months` is zero or above
    /// [`MAX_MONTHS`], the goal is negative, or the plan parameters are out
    /// of range.
    pub fn generate(
        goal_amount: Money,
        months: u32,
        plan: &PlanConfig,
    ) -> EngineResult<Vec<PlanScheduleEntry>> {
        Self::validate_request(goal_amount, months)?;
        plan.validate()?;

        let weights = curve_weights(plan, months);
        let targets = AllocationUtil::allocate_weighted(goal_amount, &weights);

        tracing::debug!(
            goal = %goal_amount,
            months,
            plan_type = %plan.plan_type(),
            "generated ideal schedule"
        );

        Ok((1..=months)
            .zip(targets)
            .map(|(month, target)| PlanScheduleEntry::ideal(month, target))
            .collect())
    }

    /// Resolves an untyped plan-type name and parameter bag, then generates
    /// its schedule. Returns the resolved plan alongside the schedule.
    ///
    /// Numeric inputs are checked before the plan type is looked at.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for bad numbers or parameters and
    /// `EngineError::UnknownPlanType` for an unrecognized plan type.
    pub fn generate_from_parts(
        goal_amount: Money,
        months: u32,
        plan_type: &str,
        extra_config: Option<&Value>,
        defaults: &PlanDefaults,
    ) -> EngineResult<(PlanConfig, Vec<PlanScheduleEntry>)> {
        Self::validate_request(goal_amount, months)?;
        let plan = PlanConfig::from_parts(plan_type, extra_config, defaults)?;
        let schedule = Self::generate(goal_amount, months, &plan)?;
        Ok((plan, schedule))
    }

    fn validate_request(goal_amount: Money, months: u32) -> EngineResult<()> {
        if months < 1 {
            return Err(EngineError::InvalidInput(
                "months must be at least 1".into(),
            ));
        }
        if months > MAX_MONTHS {
            return Err(EngineError::InvalidInput(format!(
                "months must be at most {MAX_MONTHS}, got {months}"
            )));
        }
        if goal_amount.is_negative() {
            return Err(EngineError::InvalidInput(format!(
                "goal amount cannot be negative, got {goal_amount}"
            )));
        }
        Ok(())
    }
}
