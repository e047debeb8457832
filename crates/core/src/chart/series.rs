//! Chart series builders.
//!
//! Every series is an ordered list of [`ChartPoint`]s with values in minor
//! units. Converting to major units is left to whoever draws them.

use pennyplan_shared::types::Money;
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationBucket;
use crate::budget::{CategoryWithExpenses, ProjectHierarchy, ProjectSummary};
use crate::plan::PlanScheduleEntry;

/// One labelled value of a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Label.
    pub name: String,
    /// Value in minor units.
    pub value: Money,
}

impl ChartPoint {
    /// Creates a point.
    pub fn new(name: impl Into<String>, value: Money) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Builds chart series from engine outputs.
pub struct ChartSeries;

impl ChartSeries {
    /// Budget per category.
    #[must_use]
    pub fn category_budgets(hierarchy: &ProjectHierarchy) -> Vec<ChartPoint> {
        hierarchy
            .categories
            .iter()
            .map(|c| ChartPoint::new(c.category.name.clone(), c.category.budget))
            .collect()
    }

    /// Amount consumed per category, read from an already computed summary.
    #[must_use]
    pub fn category_spending(summary: &ProjectSummary) -> Vec<ChartPoint> {
        summary
            .categories
            .iter()
            .map(|c| ChartPoint::new(c.name.clone(), c.consumed))
            .collect()
    }

    /// Expenses of one category.
    #[must_use]
    pub fn expenses(category: &CategoryWithExpenses) -> Vec<ChartPoint> {
        category
            .expenses
            .iter()
            .map(|e| ChartPoint::new(e.name.clone(), e.amount))
            .collect()
    }

    /// Allocation buckets as points.
    #[must_use]
    pub fn allocation(buckets: &[AllocationBucket]) -> Vec<ChartPoint> {
        buckets
            .iter()
            .map(|b| ChartPoint::new(b.name.clone(), b.value))
            .collect()
    }

    /// Ideal target per month, labelled `Month N`.
    #[must_use]
    pub fn schedule_targets(schedule: &[PlanScheduleEntry]) -> Vec<ChartPoint> {
        schedule
            .iter()
            .map(|e| ChartPoint::new(month_label(e.month), e.ideal_target))
            .collect()
    }

    /// Cumulative actual per month, for the months that have one.
    #[must_use]
    pub fn schedule_actuals(schedule: &[PlanScheduleEntry]) -> Vec<ChartPoint> {
        schedule
            .iter()
            .filter_map(|e| {
                e.cumulative_actual
                    .map(|value| ChartPoint::new(month_label(e.month), value))
            })
            .collect()
    }
}

fn month_label(month: u32) -> String {
    format!("Month {month}")
}
