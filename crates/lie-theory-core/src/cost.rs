//! Cost curves for levelled upgrades.
//!
//! A [`CostCurve`] maps the current level of an upgrade to the price of the
//! next level. Curves are plain data so they can be configured from YAML.
//! Prices that leave the [`Decimal`] range come back as `None` and are
//! treated as unaffordable.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

/// Upper bound on levels bought by one bulk purchase.
///
/// Keeps [`CostCurve::max_affordable`] finite for free or flat curves.
pub const MAX_BULK_LEVELS: u64 = 10_000;

/// Price of the next level as a function of the current level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostCurve {
    /// Every level costs nothing.
    Free,

    /// `base · growth^level`.
    ///
    /// The host writes this as `base · 2^(progress·level)`; `growth` is
    /// `2^progress`, kept exact for the integer ratios the theory ships with.
    Exponential {
        /// Price of level 0.
        base: Decimal,
        /// Ratio between consecutive prices.
        growth: Decimal,
    },

    /// `base + progress · level`.
    Linear {
        /// Price of level 0.
        base: Decimal,
        /// Increase per level.
        progress: Decimal,
    },

    /// Level 0 is free; level `n` costs what `inner` charges for `n - 1`.
    FirstFree {
        /// The curve that applies after the free level.
        inner: Box<CostCurve>,
    },
}

impl CostCurve {
    /// Convenience constructor for [`CostCurve::Exponential`].
    pub const fn exponential(base: Decimal, growth: Decimal) -> Self {
        Self::Exponential { base, growth }
    }

    /// Convenience constructor for [`CostCurve::FirstFree`].
    pub fn first_free(inner: Self) -> Self {
        Self::FirstFree {
            inner: Box::new(inner),
        }
    }

    /// Price of buying the level after `level`, or `None` if unrepresentable.
    pub fn cost(&self, level: u64) -> Option<Decimal> {
        match self {
            Self::Free => Some(Decimal::ZERO),
            Self::Exponential { base, growth } => base.checked_mul(growth.checked_powu(level)?),
            Self::Linear { base, progress } => {
                base.checked_add(progress.checked_mul(Decimal::from(level))?)
            }
            Self::FirstFree { inner } => match level.checked_sub(1) {
                None => Some(Decimal::ZERO),
                Some(previous) => inner.cost(previous),
            },
        }
    }

    /// Whether every parameter is at least zero, so no level can have a
    /// negative price.
    pub fn is_non_negative(&self) -> bool {
        match self {
            Self::Free => true,
            Self::Exponential { base, growth } => {
                *base >= Decimal::ZERO && *growth >= Decimal::ZERO
            }
            Self::Linear { base, progress } => {
                *base >= Decimal::ZERO && *progress >= Decimal::ZERO
            }
            Self::FirstFree { inner } => inner.is_non_negative(),
        }
    }

    /// Total price of buying `amount` levels starting at `level`.
    pub fn total_cost(&self, level: u64, amount: u64) -> Option<Decimal> {
        let end = level.checked_add(amount)?;
        (level..end).try_fold(Decimal::ZERO, |total, l| total.checked_add(self.cost(l)?))
    }

    /// How many levels starting at `level` fit into `budget`, and their
    /// combined price.
    ///
    /// Stops at [`MAX_BULK_LEVELS`].
    pub fn max_affordable(&self, level: u64, budget: Decimal) -> (u64, Decimal) {
        let mut count: u64 = 0;
        let mut total = Decimal::ZERO;
        while count < MAX_BULK_LEVELS {
            let Some(current) = level.checked_add(count) else {
                break;
            };
            let Some(next_total) = self.cost(current).and_then(|c| total.checked_add(c)) else {
                break;
            };
            if next_total > budget {
                break;
            }
            total = next_total;
            count = count.saturating_add(1);
        }
        (count, total)
    }
}
