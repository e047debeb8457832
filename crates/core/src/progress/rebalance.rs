//! Re-spreading the outstanding goal over the months not yet logged.
//!
//! Kept apart from [`ProgressReconciler::reconcile`], which never changes a
//! target.

use pennyplan_shared::types::Money;

use super::reconciler::{LoggedActuals, ProgressReconciler};
use crate::allocation::AllocationUtil;
use crate::error::{EngineError, EngineResult};
use crate::plan::PlanScheduleEntry;

impl ProgressReconciler {
    /// Reconciles, then replaces the targets of every month after the
    /// highest logged one so that they cover what is still missing.
    ///
    /// The outstanding amount is `goal - cumulative actual` (never below
    /// zero), where `goal` is the sum of the schedule's targets. It is
    /// split in proportion to the original targets of the remaining months
    /// (uniformly if those are all zero), with the same exactness rule as
    /// plan generation. With nothing logged, or every month logged, the
    /// result equals [`ProgressReconciler::reconcile`].
    ///
    /// # Errors
    ///
    /// Same as [`ProgressReconciler::reconcile`].
    pub fn rebalance(
        schedule: &[PlanScheduleEntry],
        actuals: &LoggedActuals,
    ) -> EngineResult<Vec<PlanScheduleEntry>> {
        let mut reconciled = Self::reconcile(schedule, actuals)?;

        let Some(&last_logged) = actuals.keys().next_back() else {
            return Ok(reconciled);
        };
        let split = last_logged as usize;
        if split >= reconciled.len() {
            return Ok(reconciled);
        }

        let goal = Money::checked_sum(reconciled.iter().map(|e| e.ideal_target))
            .ok_or_else(|| EngineError::overflow("goal"))?;
        let achieved = reconciled[split - 1]
            .cumulative_actual
            .unwrap_or(Money::ZERO);
        let outstanding = if achieved >= goal {
            Money::ZERO
        } else {
            goal - achieved
        };

        let weights: Vec<u128> = reconciled[split..]
            .iter()
            .map(|e| u128::from(e.ideal_target.minor().unsigned_abs()))
            .collect();
        let targets = AllocationUtil::allocate_weighted(outstanding, &weights);

        for (entry, target) in reconciled[split..].iter_mut().zip(targets) {
            entry.ideal_target = target;
        }

        tracing::debug!(
            last_logged,
            outstanding = %outstanding,
            remaining_months = reconciled.len() - split,
            "rebalanced remaining months"
        );

        Ok(reconciled)
    }
}
