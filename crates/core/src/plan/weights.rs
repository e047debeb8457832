//! Monthly weighting curves per plan type.
//!
//! Weights are integers so that the split of the goal is exact integer
//! arithmetic. Growth curves are computed in `Decimal` and scaled by
//! [`WEIGHT_SCALE`] before rounding.
//!
//! - savings: every month weighs 1
//! - investment: month `i` of `n` weighs `f^-(n-i)`, `f = 1 + annual_rate / 12`
//! - hybrid: `s * 1 + (100 - s) * growth`, `s` = savings share in percent

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::types::PlanConfig;

/// Fixed-point scale of growth weights. The final month weighs exactly this.
pub const WEIGHT_SCALE: u64 = 1_000_000_000_000;

const MONTHS_PER_YEAR: i64 = 12;

/// Returns one integer weight per month for `plan`.
///
/// Every curve is non-decreasing in month index and the final month's
/// weight is never zero.
#[must_use]
pub fn curve_weights(plan: &PlanConfig, months: u32) -> Vec<u128> {
    match plan {
        PlanConfig::Savings => vec![1; months as usize],
        PlanConfig::Investment { annual_rate } => growth_weights(*annual_rate, months),
        PlanConfig::Hybrid {
            annual_rate,
            savings_share_percent,
        } => {
            let flat_share = u128::from(*savings_share_percent);
            let growth_share = 100 - flat_share;
            let flat = u128::from(WEIGHT_SCALE) * flat_share;
            growth_weights(*annual_rate, months)
                .into_iter()
                .map(|g| flat + growth_share * g)
                .collect()
        }
    }
}

/// Geometric weights anchored at the final month.
///
/// Walks backwards dividing by the monthly factor, so values only shrink and
/// nothing can overflow however long the plan runs.
fn growth_weights(annual_rate: Decimal, months: u32) -> Vec<u128> {
    let factor = Decimal::ONE + annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let mut weights = vec![0; months as usize];
    let mut current = Decimal::from(WEIGHT_SCALE);

    for slot in weights.iter_mut().rev() {
        *slot = current.round().to_u128().unwrap_or(0);
        current /= factor;
    }

    weights
}
