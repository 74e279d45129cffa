//! Publication multiplier, tau, and the 2D graph value.
//!
//! Publishing trades the current run's currency and regular upgrades for a
//! permanent multiplier `tau^exponent / divisor`. The multiplier starts at 1
//! and only ever grows: a publication is allowed only when the formula beats
//! the current bonus.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// `tau^exponent / divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationFormula {
    /// Power applied to tau.
    pub exponent: Decimal,
    /// Divisor applied after the power.
    pub divisor: Decimal,
}

impl Default for PublicationFormula {
    fn default() -> Self {
        Self {
            exponent: Decimal::new(164, 3),
            divisor: Decimal::from(3),
        }
    }
}

impl PublicationFormula {
    /// Multiplier a publication at `tau` would grant.
    ///
    /// Non-positive tau gives 0. Returns `None` if the value is not
    /// representable or the divisor is zero.
    pub fn multiplier(&self, tau: Decimal) -> Option<Decimal> {
        if tau <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }
        tau.checked_powd(self.exponent)?.checked_div(self.divisor)
    }

    /// LaTeX for the formula, with `symbol` standing for tau.
    pub fn formula(&self, symbol: &str) -> String {
        format!(
            "\\frac{{{{{symbol}}}^{{{}}}}}{{{}}}",
            self.exponent.normalize(),
            self.divisor.normalize()
        )
    }
}

/// Publication bookkeeping for one theory instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    /// The formula in force.
    formula: PublicationFormula,
    /// Multiplier granted by the latest publication (1 before any).
    bonus: Decimal,
}

impl Publication {
    /// No publication yet: bonus 1.
    pub const fn new(formula: PublicationFormula) -> Self {
        Self {
            formula,
            bonus: Decimal::ONE,
        }
    }

    /// Restore a stored bonus. Bonuses below 1 are raised to 1.
    pub fn with_bonus(formula: PublicationFormula, bonus: Decimal) -> Self {
        Self {
            formula,
            bonus: bonus.max(Decimal::ONE),
        }
    }

    /// The formula in force.
    pub const fn formula(&self) -> &PublicationFormula {
        &self.formula
    }

    /// Current multiplier applied to every tick.
    pub const fn bonus(&self) -> Decimal {
        self.bonus
    }

    /// The bonus publishing at `tau` would give, if it beats the current one.
    pub fn improvement(&self, tau: Decimal) -> Option<Decimal> {
        self.formula
            .multiplier(tau)
            .filter(|candidate| *candidate > self.bonus)
    }

    /// Record a publication at `tau`. Returns the new bonus, or `None` (and
    /// changes nothing) if it would not improve on the current one.
    pub fn publish(&mut self, tau: Decimal) -> Option<Decimal> {
        let next = self.improvement(tau)?;
        self.bonus = next;
        Some(next)
    }
}

/// Value plotted on the host's 2D graph: `sign(v) · log10(1 + |v|)`.
pub fn graph_value(value: Decimal) -> f64 {
    let magnitude = value
        .abs()
        .checked_add(Decimal::ONE)
        .and_then(|v| v.checked_log10())
        .and_then(|v| v.to_f64())
        .unwrap_or(0.0);
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}
