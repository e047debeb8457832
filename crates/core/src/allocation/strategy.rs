//! Allocation strategy port.
//!
//! The remainder allocator never computes buckets itself; it asks an
//! injected strategy and then checks what came back. Strategies may be
//! local ([`super::WeightedAllocationStrategy`]) or remote.

use async_trait::async_trait;
use pennyplan_shared::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::PlanConfig;

/// Failure reported by an allocation strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The strategy could not be reached at all.
    #[error("Allocation strategy unreachable: {0}")]
    Unreachable(String),

    /// The strategy did not answer in time.
    #[error("Allocation strategy timed out")]
    Timeout,

    /// The strategy answered with something that is not a bucket mapping.
    #[error("Malformed allocation response: {0}")]
    Malformed(String),
}

/// What a strategy is asked to split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Positive remainder to split, in minor units.
    pub remainder: Money,
    /// Plan type and parameters of the project.
    pub plan: PlanConfig,
}

/// One bucket as proposed by a strategy, before validation.
///
/// Values are `Decimal` because external strategies may answer with
/// fractional numbers; the allocator settles them into minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedBucket {
    /// Bucket label.
    pub name: String,
    /// Proposed value in minor units.
    pub value: Decimal,
}

impl ProposedBucket {
    /// Creates a proposal.
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Splits a positive remainder into named buckets.
///
/// The result is expected, but not trusted, to sum to the remainder.
#[async_trait]
pub trait AllocationStrategy: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &str;

    /// Proposes a bucket breakdown for `request`.
    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Vec<ProposedBucket>, StrategyError>;
}
