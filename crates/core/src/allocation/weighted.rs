//! Built-in allocation strategy driven by fixed percentage tables.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::strategy::{AllocationRequest, AllocationStrategy, ProposedBucket, StrategyError};
use super::util::AllocationUtil;
use crate::plan::PlanConfig;

/// Local strategy splitting the remainder by a per-plan-type percentage
/// table:
///
/// | plan       | buckets                                    |
/// |------------|--------------------------------------------|
/// | savings    | reserve 70, emergency 30                   |
/// | investment | growth 80, reserve 20                      |
/// | hybrid     | reserve = savings share, growth = the rest |
///
/// Splits with the largest remainder method, so buckets always sum to the
/// remainder exactly. Buckets at 0% are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAllocationStrategy;

impl WeightedAllocationStrategy {
    /// Bucket names and percentages used for `plan`.
    #[must_use]
    pub fn table(plan: &PlanConfig) -> Vec<(&'static str, u32)> {
        let table = match plan {
            PlanConfig::Savings => vec![("reserve", 70), ("emergency", 30)],
            PlanConfig::Investment { .. } => vec![("growth", 80), ("reserve", 20)],
            PlanConfig::Hybrid {
                savings_share_percent,
                ..
            } => {
                let reserve = u32::from(*savings_share_percent).min(100);
                vec![("reserve", reserve), ("growth", 100 - reserve)]
            }
        };
        table.into_iter().filter(|(_, pct)| *pct > 0).collect()
    }
}

#[async_trait]
impl AllocationStrategy for WeightedAllocationStrategy {
    fn name(&self) -> &str {
        "weighted"
    }

    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Vec<ProposedBucket>, StrategyError> {
        let table = Self::table(&request.plan);
        let percentages: Vec<u32> = table.iter().map(|(_, pct)| *pct).collect();
        let parts = AllocationUtil::allocate_by_percentages(request.remainder, &percentages);

        Ok(table
            .into_iter()
            .zip(parts)
            .map(|((name, _), part)| ProposedBucket::new(name, Decimal::from(part.minor())))
            .collect())
    }
}
