//! Consumption roll-ups over a project hierarchy.

use pennyplan_shared::types::Money;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    CategorySummary, CategoryWithExpenses, ConsumptionStatus, Expense, ProjectHierarchy,
    ProjectSummary,
};
use crate::error::{EngineError, EngineResult};

/// Warning threshold as an exact fraction: 4/5 = 80%.
const WARNING_NUMERATOR: i128 = 4;
const WARNING_DENOMINATOR: i128 = 5;

/// Aggregates expenses into categories and categories into a project.
///
/// Totals are checked: a hierarchy whose sums leave `i64` fails with
/// `EngineError::InvalidInput` instead of wrapping.
pub struct BudgetAggregator;

impl BudgetAggregator {
    /// Sum of expense amounts.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the total overflows.
    pub fn consumed_amount(expenses: &[Expense]) -> EngineResult<Money> {
        Money::checked_sum(expenses.iter().map(|e| e.amount))
            .ok_or_else(|| EngineError::overflow("consumed amount"))
    }

    /// `consumed / budget`, or `None` when the budget is not positive.
    ///
    /// Not clamped: overspend yields a ratio above 1.
    #[must_use]
    pub fn consumption_ratio(consumed: Money, budget: Money) -> Option<Decimal> {
        if budget <= Money::ZERO {
            return None;
        }
        Decimal::from(consumed.minor()).checked_div(Decimal::from(budget.minor()))
    }

    /// Consumption as a display percentage: clamped to `[0, 100]`, rounded
    /// half-up to two decimals. Zero when there is no budget.
    #[must_use]
    pub fn progress_percent(consumed: Money, budget: Money) -> Decimal {
        Self::consumption_ratio(consumed, budget)
            .map_or(Decimal::ZERO, |ratio| {
                (ratio * Decimal::ONE_HUNDRED).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            })
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Three-way threshold classification.
    ///
    /// `Danger` at 100% or more, `Warning` from 80%, `Normal` otherwise
    /// (including a zero budget). Compared by integer cross multiplication,
    /// so the boundaries are exact.
    #[must_use]
    pub fn classify(consumed: Money, budget: Money) -> ConsumptionStatus {
        if budget <= Money::ZERO {
            return ConsumptionStatus::Normal;
        }
        let consumed = i128::from(consumed.minor());
        let budget = i128::from(budget.minor());

        if consumed >= budget {
            ConsumptionStatus::Danger
        } else if consumed * WARNING_DENOMINATOR >= budget * WARNING_NUMERATOR {
            ConsumptionStatus::Warning
        } else {
            ConsumptionStatus::Normal
        }
    }

    /// Rolls up one category.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if a total overflows.
    pub fn summarize_category(entry: &CategoryWithExpenses) -> EngineResult<CategorySummary> {
        let budget = entry.category.budget;
        let consumed = Self::consumed_amount(&entry.expenses)?;

        Ok(CategorySummary {
            category_id: entry.category.id,
            name: entry.category.name.clone(),
            budget,
            consumed,
            remaining: difference(budget, consumed, "category remaining")?,
            ratio: Self::consumption_ratio(consumed, budget),
            progress_percent: Self::progress_percent(consumed, budget),
            status: Self::classify(consumed, budget),
        })
    }

    /// Total consumed across every category of a project.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the total overflows.
    pub fn total_consumed(hierarchy: &ProjectHierarchy) -> EngineResult<Money> {
        let per_category = hierarchy
            .categories
            .iter()
            .map(|c| Self::consumed_amount(&c.expenses))
            .collect::<EngineResult<Vec<_>>>()?;
        Money::checked_sum(per_category).ok_or_else(|| EngineError::overflow("project consumed"))
    }

    /// Rolls up a project.
    ///
    /// Ratio, progress and status are taken against the sum of the category
    /// budgets; `remainder` is taken against the project budget.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if a total overflows.
    pub fn summarize_project(hierarchy: &ProjectHierarchy) -> EngineResult<ProjectSummary> {
        let categories = hierarchy
            .categories
            .iter()
            .map(Self::summarize_category)
            .collect::<EngineResult<Vec<_>>>()?;

        let budget = hierarchy.project.budget;
        let allocated = Money::checked_sum(categories.iter().map(|c| c.budget))
            .ok_or_else(|| EngineError::overflow("allocated budget"))?;
        let consumed = Money::checked_sum(categories.iter().map(|c| c.consumed))
            .ok_or_else(|| EngineError::overflow("project consumed"))?;

        tracing::debug!(
            project = %hierarchy.project.id,
            categories = categories.len(),
            consumed = %consumed,
            "summarized project"
        );

        Ok(ProjectSummary {
            project_id: hierarchy.project.id,
            name: hierarchy.project.name.clone(),
            budget,
            allocated,
            unallocated: difference(budget, allocated, "unallocated budget")?,
            consumed,
            remainder: difference(budget, consumed, "project remainder")?,
            ratio: Self::consumption_ratio(consumed, allocated),
            progress_percent: Self::progress_percent(consumed, allocated),
            status: Self::classify(consumed, allocated),
            categories,
        })
    }
}

fn difference(budget: Money, spent: Money, what: &str) -> EngineResult<Money> {
    budget
        .checked_sub(spent)
        .ok_or_else(|| EngineError::overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn m(minor: i64) -> Money {
        Money::from_minor(minor)
    }

    #[rstest]
    #[case(0, 1000, ConsumptionStatus::Normal)]
    #[case(799, 1000, ConsumptionStatus::Normal)]
    #[case(800, 1000, ConsumptionStatus::Warning)]
    #[case(999, 1000, ConsumptionStatus::Warning)]
    #[case(1000, 1000, ConsumptionStatus::Danger)]
    #[case(1500, 1000, ConsumptionStatus::Danger)]
    #[case(500, 0, ConsumptionStatus::Normal)]
    #[case(7_999_999, 10_000_000, ConsumptionStatus::Normal)]
    #[case(8_000_000, 10_000_000, ConsumptionStatus::Warning)]
    fn test_classify_boundaries(
        #[case] consumed: i64,
        #[case] budget: i64,
        #[case] expected: ConsumptionStatus,
    ) {
        assert_eq!(BudgetAggregator::classify(m(consumed), m(budget)), expected);
    }

    #[test]
    fn test_ratio_undefined_for_zero_budget() {
        assert_eq!(BudgetAggregator::consumption_ratio(m(10), m(0)), None);
        assert_eq!(
            BudgetAggregator::consumption_ratio(m(150), m(100)),
            Some(dec!(1.5))
        );
    }

    #[rstest]
    #[case(0, 1000, dec!(0))]
    #[case(333, 1000, dec!(33.30))]
    #[case(1, 3, dec!(33.33))]
    #[case(2, 3, dec!(66.67))]
    #[case(1500, 1000, dec!(100))]
    #[case(10, 0, dec!(0))]
    fn test_progress_percent(#[case] consumed: i64, #[case] budget: i64, #[case] expected: Decimal) {
        assert_eq!(
            BudgetAggregator::progress_percent(m(consumed), m(budget)),
            expected
        );
    }
}
