//! Allocator scenarios against stub strategies, plus property tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pennyplan_shared::types::Money;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::EngineError;
use crate::plan::PlanConfig;

/// Strategy returning a canned answer and counting calls.
struct StubStrategy {
    answer: Result<Vec<ProposedBucket>, StrategyError>,
    calls: AtomicUsize,
}

impl StubStrategy {
    fn answering(pairs: &[(&str, Decimal)]) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(pairs
                .iter()
                .map(|(n, v)| ProposedBucket::new(*n, *v))
                .collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(error: StrategyError) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AllocationStrategy for StubStrategy {
    fn name(&self) -> &str {
        "stub"
    }

    async fn allocate(
        &self,
        _request: &AllocationRequest,
    ) -> Result<Vec<ProposedBucket>, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

fn m(minor: i64) -> Money {
    Money::from_minor(minor)
}

#[tokio::test]
async fn test_valid_proposal_accepted() {
    let stub = StubStrategy::answering(&[("reserve", dec!(300)), ("growth", dec!(200))]);
    let allocator = RemainderAllocator::new(stub.clone());

    let buckets = allocator
        .allocate(m(5000), m(4500), &PlanConfig::Savings)
        .await
        .unwrap();

    assert_eq!(
        buckets,
        vec![
            AllocationBucket::new("reserve", m(300)),
            AllocationBucket::new("growth", m(200)),
        ]
    );
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_mismatched_proposal_rejected() {
    let stub = StubStrategy::answering(&[("reserve", dec!(300)), ("growth", dec!(250))]);
    let allocator = RemainderAllocator::new(stub);

    let result = allocator
        .allocate(m(5000), m(4500), &PlanConfig::Savings)
        .await;
    assert!(matches!(result, Err(EngineError::AllocationUnavailable(_))));
}

#[tokio::test]
async fn test_overspend_skips_strategy() {
    let stub = StubStrategy::answering(&[("reserve", dec!(1))]);
    let allocator = RemainderAllocator::new(stub.clone());

    let buckets = allocator
        .allocate(m(5000), m(5200), &PlanConfig::Savings)
        .await
        .unwrap();

    assert_eq!(buckets, vec![AllocationBucket::new(OVERSPENT_BUCKET, m(200))]);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_exactly_spent_is_zero_overspend() {
    let stub = StubStrategy::answering(&[("reserve", dec!(1))]);
    let allocator = RemainderAllocator::new(stub.clone());

    let buckets = allocator
        .allocate(m(5000), m(5000), &PlanConfig::Savings)
        .await
        .unwrap();

    assert_eq!(buckets, vec![AllocationBucket::new(OVERSPENT_BUCKET, m(0))]);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_strategy_failures_surface_as_unavailable() {
    for error in [
        StrategyError::Unreachable("connection refused".into()),
        StrategyError::Timeout,
        StrategyError::Malformed("not an object".into()),
    ] {
        let allocator = RemainderAllocator::new(StubStrategy::failing(error.clone()));
        let result = allocator
            .allocate(m(100), m(0), &PlanConfig::Savings)
            .await;
        assert!(
            matches!(result, Err(EngineError::AllocationUnavailable(_))),
            "{error:?}"
        );
    }
}

#[tokio::test]
async fn test_invalid_inputs_rejected_before_strategy() {
    let stub = StubStrategy::answering(&[("reserve", dec!(100))]);
    let allocator = RemainderAllocator::new(stub.clone());

    let result = allocator
        .allocate(m(-100), m(0), &PlanConfig::Savings)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));

    let bad_plan = PlanConfig::Investment {
        annual_rate: dec!(2),
    };
    let result = allocator.allocate(m(100), m(0), &bad_plan).await;
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_weighted_strategy_end_to_end() {
    let allocator = RemainderAllocator::new(Arc::new(WeightedAllocationStrategy));
    let plan = PlanConfig::Investment {
        annual_rate: dec!(0.06),
    };

    let buckets = allocator.allocate(m(5000), m(4500), &plan).await.unwrap();
    assert_eq!(
        buckets,
        vec![
            AllocationBucket::new("growth", m(400)),
            AllocationBucket::new("reserve", m(100)),
        ]
    );
}

fn plan_strategy() -> impl Strategy<Value = PlanConfig> {
    prop_oneof![
        Just(PlanConfig::Savings),
        (0u32..=100).prop_map(|r| PlanConfig::Investment {
            annual_rate: Decimal::new(i64::from(r), 2),
        }),
        (0u32..=100, 0u8..=100).prop_map(|(r, s)| PlanConfig::Hybrid {
            annual_rate: Decimal::new(i64::from(r), 2),
            savings_share_percent: s,
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The built-in strategy always passes the exact-sum check.
    #[test]
    fn prop_weighted_buckets_sum_to_remainder(
        budget in 0i64..100_000_000,
        consumed in 0i64..100_000_000,
        plan in plan_strategy(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let allocator = RemainderAllocator::new(Arc::new(WeightedAllocationStrategy));
        let buckets = runtime
            .block_on(allocator.allocate(m(budget), m(consumed), &plan))
            .unwrap();

        let total: Money = buckets.iter().map(|b| b.value).sum();
        if budget > consumed {
            prop_assert_eq!(total, m(budget - consumed));
        } else {
            prop_assert_eq!(buckets.len(), 1);
            prop_assert_eq!(&buckets[0].name, OVERSPENT_BUCKET);
            prop_assert_eq!(total, m(consumed - budget));
        }
        prop_assert!(buckets.iter().all(|b| !b.value.is_negative()));
    }

    /// A proposal within one unit of the remainder is settled exactly.
    #[test]
    fn prop_accepted_proposals_are_exact(
        tenths in prop::collection::vec(0i64..10_000_000, 1..6),
    ) {
        let raw: i64 = tenths.iter().sum();
        // floor of the raw sum, so the drift is always below one unit
        let remainder = (raw / 10).max(1);
        let proposal: Vec<ProposedBucket> = tenths
            .iter()
            .enumerate()
            .map(|(i, t)| ProposedBucket::new(format!("b{i}"), Decimal::new(*t, 1)))
            .collect();

        match RemainderAllocator::reconcile_proposal(m(remainder), proposal) {
            Ok(buckets) => {
                prop_assert_eq!(buckets.iter().map(|b| b.value).sum::<Money>(), m(remainder));
                prop_assert!(buckets.iter().all(|b| !b.value.is_negative()));
            }
            Err(e) => prop_assert!(matches!(e, EngineError::AllocationUnavailable(_))),
        }
    }
}
