//! Overlaying logged amounts onto an ideal schedule.

use std::collections::BTreeMap;

use pennyplan_shared::types::Money;

use crate::error::{EngineError, EngineResult};
use crate::plan::{PaceStatus, PlanScheduleEntry};

/// Logged amounts keyed by 1-based month index. Sparse: unlogged months
/// are simply absent.
pub type LoggedActuals = BTreeMap<u32, Money>;

/// Merges logged progress into an ideal schedule.
///
/// Stateless: every call recomputes the whole cumulative series from the
/// ideal targets and the actuals it is given.
pub struct ProgressReconciler;

impl ProgressReconciler {
    /// Reconciles `schedule` against `actuals`.
    ///
    /// Months up to the highest logged month get cumulative figures and a
    /// pace status; an unlogged month inside that range counts as zero
    /// progress and keeps `actual_logged = None`. Months past the highest
    /// logged month keep only their ideal target. Any reconciliation data
    /// already present on the input entries is discarded.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the schedule is empty, its
    /// months are not `1..=n`, a target is negative, an actual is negative,
    /// an actual names a month outside the schedule, or a cumulative total
    /// overflows.
    pub fn reconcile(
        schedule: &[PlanScheduleEntry],
        actuals: &LoggedActuals,
    ) -> EngineResult<Vec<PlanScheduleEntry>> {
        Self::validate(schedule, actuals)?;

        let last_logged = actuals.keys().next_back().copied().unwrap_or(0);
        let mut cumulative_ideal = Money::ZERO;
        let mut cumulative_actual = Money::ZERO;

        let mut reconciled = Vec::with_capacity(schedule.len());
        for entry in schedule {
            let mut out = PlanScheduleEntry::ideal(entry.month, entry.ideal_target);
            if entry.month <= last_logged {
                let logged = actuals.get(&entry.month).copied();
                cumulative_ideal = cumulative_ideal
                    .checked_add(entry.ideal_target)
                    .ok_or_else(|| EngineError::overflow("cumulative target"))?;
                cumulative_actual = cumulative_actual
                    .checked_add(logged.unwrap_or(Money::ZERO))
                    .ok_or_else(|| EngineError::overflow("cumulative actual"))?;

                out.actual_logged = logged;
                out.cumulative_ideal = Some(cumulative_ideal);
                out.cumulative_actual = Some(cumulative_actual);
                out.pace_status = Some(PaceStatus::compare(cumulative_actual, cumulative_ideal));
            }
            reconciled.push(out);
        }

        tracing::debug!(
            months = schedule.len(),
            logged = actuals.len(),
            last_logged,
            "reconciled schedule"
        );

        Ok(reconciled)
    }

    pub(crate) fn validate(
        schedule: &[PlanScheduleEntry],
        actuals: &LoggedActuals,
    ) -> EngineResult<()> {
        if schedule.is_empty() {
            return Err(EngineError::InvalidInput("schedule is empty".into()));
        }

        for (expected, entry) in (1u32..).zip(schedule) {
            if entry.month != expected {
                return Err(EngineError::InvalidInput(format!(
                    "schedule months must run 1..={}, found month {} at position {expected}",
                    schedule.len(),
                    entry.month
                )));
            }
            if entry.ideal_target.is_negative() {
                return Err(EngineError::InvalidInput(format!(
                    "month {} has a negative target",
                    entry.month
                )));
            }
        }

        let months = schedule.len();
        for (month, amount) in actuals {
            if *month < 1 || *month as usize > months {
                return Err(EngineError::InvalidInput(format!(
                    "month {month} is outside the {months}-month schedule"
                )));
            }
            if amount.is_negative() {
                return Err(EngineError::InvalidInput(format!(
                    "logged amount for month {month} cannot be negative"
                )));
            }
        }

        Ok(())
    }
}
