//! Remainder allocation.

use std::collections::HashSet;
use std::sync::Arc;

use pennyplan_shared::types::Money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::strategy::{AllocationRequest, AllocationStrategy, ProposedBucket};
use crate::error::{EngineError, EngineResult};
use crate::plan::PlanConfig;

/// Name of the single bucket returned when consumption meets or exceeds
/// the budget.
pub const OVERSPENT_BUCKET: &str = "overspent";

/// A named portion of an allocated remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationBucket {
    /// Bucket label.
    pub name: String,
    /// Amount in minor units.
    pub value: Money,
}

impl AllocationBucket {
    /// Creates a bucket.
    pub fn new(name: impl Into<String>, value: Money) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Splits a project's unspent remainder into buckets through an injected
/// [`AllocationStrategy`].
///
/// Read-only: holds nothing but the strategy handle.
#[derive(Clone)]
pub struct RemainderAllocator {
    strategy: Arc<dyn AllocationStrategy>,
}

impl std::fmt::Debug for RemainderAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemainderAllocator")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl RemainderAllocator {
    /// Creates an allocator backed by `strategy`.
    #[must_use]
    pub fn new(strategy: Arc<dyn AllocationStrategy>) -> Self {
        Self { strategy }
    }

    /// `budget - consumed`, negative when overspent.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if either amount is negative.
    pub fn remainder(budget: Money, consumed: Money) -> EngineResult<Money> {
        if budget.is_negative() {
            return Err(EngineError::InvalidInput(format!(
                "project budget cannot be negative, got {budget}"
            )));
        }
        if consumed.is_negative() {
            return Err(EngineError::InvalidInput(format!(
                "consumed amount cannot be negative, got {consumed}"
            )));
        }
        Ok(budget - consumed)
    }

    /// Allocates what is left of `budget` after `consumed`.
    ///
    /// A remainder of zero or less yields a single [`OVERSPENT_BUCKET`]
    /// holding `|remainder|`, and the strategy is not called. Otherwise the
    /// strategy's proposal is checked with
    /// [`RemainderAllocator::reconcile_proposal`].
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for negative inputs or invalid
    /// plan parameters, and `EngineError::AllocationUnavailable` if the
    /// strategy fails or proposes an unusable breakdown.
    pub async fn allocate(
        &self,
        budget: Money,
        consumed: Money,
        plan: &PlanConfig,
    ) -> EngineResult<Vec<AllocationBucket>> {
        let remainder = Self::remainder(budget, consumed)?;
        plan.validate()?;

        if remainder <= Money::ZERO {
            tracing::debug!(remainder = %remainder, "remainder exhausted, reporting overspend");
            return Ok(vec![AllocationBucket::new(OVERSPENT_BUCKET, remainder.abs())]);
        }

        let request = AllocationRequest {
            remainder,
            plan: plan.clone(),
        };

        let proposal = self.strategy.allocate(&request).await.map_err(|e| {
            tracing::warn!(strategy = self.strategy.name(), error = %e, "allocation strategy failed");
            EngineError::AllocationUnavailable(e.to_string())
        })?;

        let buckets = Self::reconcile_proposal(remainder, proposal).inspect_err(|e| {
            tracing::warn!(strategy = self.strategy.name(), error = %e, "rejected allocation proposal");
        })?;

        tracing::debug!(
            strategy = self.strategy.name(),
            remainder = %remainder,
            buckets = buckets.len(),
            "allocated remainder"
        );

        Ok(buckets)
    }

    /// Checks a strategy proposal against `remainder` and settles it into
    /// minor units.
    ///
    /// The proposal must be non-empty, with unique non-blank names and
    /// non-negative values. If its raw sum is less than one minor unit away
    /// from `remainder`, every value is rounded half-up and the difference
    /// is applied to the largest bucket (the first one on a tie). Any larger
    /// mismatch is rejected.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::AllocationUnavailable` for any violation.
    pub fn reconcile_proposal(
        remainder: Money,
        proposal: Vec<ProposedBucket>,
    ) -> EngineResult<Vec<AllocationBucket>> {
        if proposal.is_empty() {
            return Err(unavailable("strategy returned no buckets"));
        }

        let mut seen = HashSet::new();
        for bucket in &proposal {
            if bucket.name.trim().is_empty() {
                return Err(unavailable("bucket name is empty"));
            }
            if !seen.insert(bucket.name.as_str()) {
                return Err(unavailable(format!("duplicate bucket '{}'", bucket.name)));
            }
            if bucket.value < Decimal::ZERO {
                return Err(unavailable(format!(
                    "bucket '{}' has negative value {}",
                    bucket.name, bucket.value
                )));
            }
        }

        let raw_sum = proposal
            .iter()
            .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b.value))
            .ok_or_else(|| unavailable("bucket values overflow"))?;
        let drift = (raw_sum - Decimal::from(remainder.minor())).abs();
        if drift >= Decimal::ONE {
            return Err(unavailable(format!(
                "buckets sum to {raw_sum}, expected {remainder}"
            )));
        }

        let mut buckets = proposal
            .into_iter()
            .map(|b| {
                b.value
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
                    .map(|minor| AllocationBucket::new(b.name, Money::from_minor(minor)))
                    .ok_or_else(|| unavailable(format!("bucket value {} out of range", b.value)))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let settled = Money::checked_sum(buckets.iter().map(|b| b.value))
            .ok_or_else(|| unavailable("bucket values overflow"))?;
        let diff = remainder - settled;
        if !diff.is_zero() {
            // Earliest maximum wins ties
            let largest = buckets
                .iter()
                .enumerate()
                .fold(0, |best, (i, b)| {
                    if b.value > buckets[best].value { i } else { best }
                });
            buckets[largest].value += diff;
            if buckets[largest].value.is_negative() {
                return Err(unavailable("rounding correction left a negative bucket"));
            }
        }

        Ok(buckets)
    }
}

fn unavailable(reason: impl Into<String>) -> EngineError {
    EngineError::AllocationUnavailable(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn proposal(pairs: &[(&str, Decimal)]) -> Vec<ProposedBucket> {
        pairs
            .iter()
            .map(|(n, v)| ProposedBucket::new(*n, *v))
            .collect()
    }

    fn values(buckets: &[AllocationBucket]) -> Vec<(String, i64)> {
        buckets
            .iter()
            .map(|b| (b.name.clone(), b.value.minor()))
            .collect()
    }

    #[test]
    fn test_remainder() {
        let m = Money::from_minor;
        assert_eq!(RemainderAllocator::remainder(m(5000), m(4500)), Ok(m(500)));
        assert_eq!(RemainderAllocator::remainder(m(5000), m(5200)), Ok(m(-200)));
        assert!(RemainderAllocator::remainder(m(-1), m(0)).is_err());
        assert!(RemainderAllocator::remainder(m(0), m(-1)).is_err());
    }

    #[test]
    fn test_exact_proposal_accepted_in_order() {
        let buckets = RemainderAllocator::reconcile_proposal(
            Money::from_minor(500),
            proposal(&[("reserve", dec!(300)), ("growth", dec!(200))]),
        )
        .unwrap();
        assert_eq!(
            values(&buckets),
            vec![("reserve".into(), 300), ("growth".into(), 200)]
        );
    }

    #[test]
    fn test_integral_mismatch_rejected() {
        let result = RemainderAllocator::reconcile_proposal(
            Money::from_minor(500),
            proposal(&[("reserve", dec!(300)), ("growth", dec!(250))]),
        );
        assert!(matches!(result, Err(EngineError::AllocationUnavailable(_))));
    }

    #[test]
    fn test_fractional_drift_corrected_on_largest() {
        // 333.4 + 166.8 = 500.2 -> 333 + 167 = 500
        let buckets = RemainderAllocator::reconcile_proposal(
            Money::from_minor(500),
            proposal(&[("growth", dec!(333.4)), ("reserve", dec!(166.8))]),
        )
        .unwrap();
        assert_eq!(
            values(&buckets),
            vec![("growth".into(), 333), ("reserve".into(), 167)]
        );

        // 100.5 + 100.5 + 99 = 300 raw, rounds to 101 + 101 + 99 = 301
        let buckets = RemainderAllocator::reconcile_proposal(
            Money::from_minor(300),
            proposal(&[("a", dec!(100.5)), ("b", dec!(100.5)), ("c", dec!(99))]),
        )
        .unwrap();
        assert_eq!(
            values(&buckets),
            vec![("a".into(), 100), ("b".into(), 101), ("c".into(), 99)]
        );
    }

    #[test]
    fn test_drift_of_one_unit_rejected() {
        let result = RemainderAllocator::reconcile_proposal(
            Money::from_minor(500),
            proposal(&[("growth", dec!(333.5)), ("reserve", dec!(167.5))]),
        );
        assert!(matches!(result, Err(EngineError::AllocationUnavailable(_))));
    }

    #[test]
    fn test_structural_problems_rejected() {
        let remainder = Money::from_minor(100);
        let cases = [
            proposal(&[]),
            proposal(&[("", dec!(100))]),
            proposal(&[("  ", dec!(100))]),
            proposal(&[("a", dec!(50)), ("a", dec!(50))]),
            proposal(&[("a", dec!(150)), ("b", dec!(-50))]),
        ];
        for case in cases {
            let result = RemainderAllocator::reconcile_proposal(remainder, case.clone());
            assert!(
                matches!(result, Err(EngineError::AllocationUnavailable(_))),
                "{case:?}"
            );
        }
    }

    #[test]
    fn test_rounding_past_i64_rejected() {
        // Raw values sum to exactly i64::MAX; both round up
        let result = RemainderAllocator::reconcile_proposal(
            Money::from_minor(i64::MAX),
            proposal(&[
                ("reserve", dec!(4611686018427387903.5)),
                ("growth", dec!(4611686018427387903.5)),
            ]),
        );
        assert!(matches!(result, Err(EngineError::AllocationUnavailable(_))));
    }

    #[test]
    fn test_zero_buckets_allowed() {
        let buckets = RemainderAllocator::reconcile_proposal(
            Money::from_minor(100),
            proposal(&[("a", dec!(100)), ("b", dec!(0))]),
        )
        .unwrap();
        assert_eq!(values(&buckets), vec![("a".into(), 100), ("b".into(), 0)]);
    }
}
