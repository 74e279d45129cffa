//! Milestone points earned from tau.
//!
//! The k-th milestone point (0-based) is earned once the tau high-water mark
//! reaches `schedule.cost(k)`. The shipped schedule is `150 · 10^k`, the
//! host's linear-in-log10 milestone cost `log10(150) + k` expressed in tau.
//! Points are spent on milestone levels and returned by refunds.

use lie_theory_types::Milestone;
use rust_decimal::Decimal;

use crate::cost::CostCurve;
use crate::progression::ProgressionState;

/// When milestone points are earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneSchedule {
    /// Tau needed for the k-th point.
    thresholds: CostCurve,
    /// Points that exist in total (sum of every milestone's max level).
    total_points: u64,
}

impl MilestoneSchedule {
    /// Schedule with the given thresholds, capped at the catalogue total.
    pub fn new(thresholds: CostCurve) -> Self {
        let total_points = Milestone::ALL
            .iter()
            .fold(0_u64, |sum, m| sum.saturating_add(m.max_level()));
        Self {
            thresholds,
            total_points,
        }
    }

    /// Maximum number of points that can ever be earned.
    pub const fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Tau needed for point `k`, if representable.
    pub fn threshold(&self, k: u64) -> Option<Decimal> {
        self.thresholds.cost(k)
    }

    /// Points earned by a tau high-water mark of `max_tau`.
    pub fn earned(&self, max_tau: Decimal) -> u64 {
        (0..self.total_points)
            .take_while(|k| self.threshold(*k).is_some_and(|t| max_tau >= t))
            .count()
            .try_into()
            .unwrap_or(self.total_points)
    }

    /// Points currently tied up in milestone levels.
    pub fn spent(state: &ProgressionState) -> u64 {
        Milestone::ALL
            .iter()
            .fold(0_u64, |sum, m| sum.saturating_add(state.milestone_level(*m)))
    }

    /// Points available to spend.
    pub fn unspent(&self, max_tau: Decimal, state: &ProgressionState) -> u64 {
        self.earned(max_tau).saturating_sub(Self::spent(state))
    }

    /// Tau needed for the next unearned point, or `None` once all are earned.
    pub fn next_threshold(&self, max_tau: Decimal) -> Option<Decimal> {
        let earned = self.earned(max_tau);
        if earned >= self.total_points {
            return None;
        }
        self.threshold(earned)
    }
}
