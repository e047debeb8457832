//! Exact integer allocation of money.
//!
//! Both functions split a total into parts whose sum EXACTLY equals the
//! total (no minor unit lost or gained):
//! 1. Compute each part's exact share of the total
//! 2. Round every share down
//! 3. Hand the leftover units out one at a time
//!
//! They differ only in who receives the leftover units.

use pennyplan_shared::types::Money;

/// Allocation utility for distributing amounts.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocate proportionally to integer weights, leftover units to the
    /// LAST positions first.
    ///
    /// Used for schedules, where the final month absorbs the correction.
    /// All-zero weights are treated as uniform. A negative total is split by
    /// magnitude and every part negated.
    ///
    /// # Example
    ///
    /// ```
    /// use pennyplan_core::allocation::AllocationUtil;
    /// use pennyplan_shared::types::Money;
    ///
    /// let parts = AllocationUtil::allocate_weighted(Money::from_minor(1000), &[1, 1, 1]);
    /// let minor: Vec<i64> = parts.iter().map(|m| m.minor()).collect();
    /// assert_eq!(minor, vec![333, 333, 334]);
    /// ```
    #[must_use]
    pub fn allocate_weighted(total: Money, weights: &[u128]) -> Vec<Money> {
        if weights.is_empty() {
            return vec![];
        }

        let uniform: Vec<u128>;
        let weights = if weights.iter().all(|w| *w == 0) {
            uniform = vec![1; weights.len()];
            &uniform[..]
        } else {
            weights
        };

        let magnitude = u128::from(total.minor().unsigned_abs());
        let total_weight: u128 = weights.iter().sum();

        let mut shares: Vec<u128> = weights
            .iter()
            .map(|w| magnitude * w / total_weight)
            .collect();

        let allocated: u128 = shares.iter().sum();
        let mut leftover = magnitude - allocated;

        // Walk backwards from the last position, wrapping if ever needed.
        let mut idx = shares.len();
        while leftover > 0 {
            idx = idx.checked_sub(1).unwrap_or(shares.len() - 1);
            shares[idx] += 1;
            leftover -= 1;
        }

        shares
            .into_iter()
            .map(|share| {
                // share <= |total|, so it always fits back into i64
                let minor = i64::try_from(share).unwrap_or(i64::MAX);
                Money::from_minor(if total.is_negative() { -minor } else { minor })
            })
            .collect()
    }

    /// Allocate by percentages using the Largest Remainder Method.
    ///
    /// Percentages are normalized by their own sum, so they need not add up
    /// to exactly 100. Ties on the fractional remainder go to the earlier
    /// position. `total` must be non-negative; a negative total yields an
    /// all-zero split.
    ///
    /// # Example
    ///
    /// ```
    /// use pennyplan_core::allocation::AllocationUtil;
    /// use pennyplan_shared::types::Money;
    ///
    /// let parts = AllocationUtil::allocate_by_percentages(Money::from_minor(100), &[50, 30, 20]);
    /// assert_eq!(parts.iter().sum::<Money>(), Money::from_minor(100));
    /// ```
    #[must_use]
    pub fn allocate_by_percentages(total: Money, percentages: &[u32]) -> Vec<Money> {
        if percentages.is_empty() {
            return vec![];
        }

        let amount = u128::try_from(total.minor()).unwrap_or(0);
        let denominator: u128 = percentages.iter().map(|p| u128::from(*p)).sum();
        if denominator == 0 {
            return vec![Money::ZERO; percentages.len()];
        }

        // (floor share, fractional remainder numerator)
        let exact: Vec<(u128, u128)> = percentages
            .iter()
            .map(|p| {
                let scaled = amount * u128::from(*p);
                (scaled / denominator, scaled % denominator)
            })
            .collect();

        let mut rounded: Vec<u128> = exact.iter().map(|(share, _)| *share).collect();
        let allocated: u128 = rounded.iter().sum();
        let units_to_distribute = amount - allocated;

        if units_to_distribute > 0 {
            let mut remainders: Vec<(usize, u128)> = exact
                .iter()
                .enumerate()
                .map(|(i, (_, rem))| (i, *rem))
                .collect();

            // Largest remainder first; stable sort keeps earlier positions ahead on ties
            remainders.sort_by(|a, b| b.1.cmp(&a.1));

            for (idx, _) in remainders
                .iter()
                .cycle()
                .take(usize::try_from(units_to_distribute).unwrap_or(usize::MAX))
            {
                rounded[*idx] += 1;
            }
        }

        rounded
            .into_iter()
            .map(|share| Money::from_minor(i64::try_from(share).unwrap_or(i64::MAX)))
            .collect()
    }
}
