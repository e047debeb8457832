//! Remainder allocation and exact integer splitting.
//!
//! - [`AllocationUtil`]: exact splits of a money amount
//! - [`AllocationStrategy`]: port for whatever proposes bucket breakdowns
//! - [`WeightedAllocationStrategy`]: built-in percentage-table strategy
//! - [`RemainderAllocator`]: remainder computation, overspend handling and
//!   proposal checking

pub mod allocator;
pub mod strategy;
pub mod util;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use allocator::{AllocationBucket, OVERSPENT_BUCKET, RemainderAllocator};
pub use strategy::{AllocationRequest, AllocationStrategy, ProposedBucket, StrategyError};
pub use util::AllocationUtil;
pub use weighted::WeightedAllocationStrategy;
