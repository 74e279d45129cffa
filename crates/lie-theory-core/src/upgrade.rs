//! Upgrade catalogue: prices, ownership, and display text.
//!
//! Regular upgrades (`c1`, `c2`) are priced by a [`CostCurve`] and reset on
//! publication. Permanent upgrades are bought once. Milestone levels live in
//! [`ProgressionState`]; this module only supplies their text.

use std::collections::BTreeSet;

use lie_theory_types::{Milestone, PermanentUpgrade, RegularUpgrade, UpgradeTarget};
use rust_decimal::Decimal;

use crate::config::{BalanceConfig, PermanentCosts};
use crate::cost::CostCurve;
use crate::currency::CurrencyError;
use crate::markup;
use crate::progression::{ProgressionError, ProgressionState};

/// Errors from buying, refunding, or publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// The upgrade is hidden or locked.
    #[error("{target:?} is not available")]
    Unavailable {
        /// The upgrade.
        target: UpgradeTarget,
    },

    /// The next level's price is not representable.
    #[error("price of {upgrade:?} at level {level} is out of range")]
    CostOutOfRange {
        /// The upgrade.
        upgrade: RegularUpgrade,
        /// Its current level.
        level: u64,
    },

    /// The permanent upgrade is already owned.
    #[error("{upgrade:?} is already owned")]
    AlreadyOwned {
        /// The upgrade.
        upgrade: PermanentUpgrade,
    },

    /// The action needs a permanent upgrade that has not been bought.
    #[error("{upgrade:?} has not been bought")]
    NotOwned {
        /// The missing upgrade.
        upgrade: PermanentUpgrade,
    },

    /// No milestone point is free to spend.
    #[error("no milestone points left for {milestone:?}")]
    NoMilestonePoints {
        /// The milestone the point was wanted for.
        milestone: Milestone,
    },

    /// Publishing now would not raise the multiplier.
    #[error("publishing now would not improve the multiplier")]
    NoImprovement,

    /// The level counter would overflow.
    #[error("level overflow for {upgrade:?}")]
    LevelOverflow {
        /// The upgrade.
        upgrade: RegularUpgrade,
    },

    /// The balance could not cover the purchase.
    #[error("currency error: {source}")]
    Currency {
        /// The underlying currency error.
        #[from]
        source: CurrencyError,
    },

    /// The milestone transition was rejected.
    #[error("progression error: {source}")]
    Progression {
        /// The underlying progression error.
        #[from]
        source: ProgressionError,
    },
}

/// Prices and ownership of everything bought with currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeBook {
    /// Price curve of `c1`.
    c1_cost: CostCurve,
    /// Price curve of `c2`.
    c2_cost: CostCurve,
    /// Prices of the permanent upgrades.
    permanent_costs: PermanentCosts,
    /// Permanent upgrades bought so far.
    owned: BTreeSet<PermanentUpgrade>,
    /// Autobuyer switch, meaningful once the autobuyer is owned.
    autobuyer_enabled: bool,
}

impl UpgradeBook {
    /// Book with the configured prices and nothing owned.
    pub fn new(balance: &BalanceConfig) -> Self {
        Self {
            c1_cost: balance.c1_cost.clone(),
            c2_cost: balance.c2_cost.clone(),
            permanent_costs: balance.permanent_costs,
            owned: BTreeSet::new(),
            autobuyer_enabled: true,
        }
    }

    /// Price curve of a regular upgrade.
    pub const fn curve(&self, upgrade: RegularUpgrade) -> &CostCurve {
        match upgrade {
            RegularUpgrade::C1 => &self.c1_cost,
            RegularUpgrade::C2 => &self.c2_cost,
        }
    }

    /// Price of the level after `level`.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::CostOutOfRange`] if it is not representable.
    pub fn next_cost(&self, upgrade: RegularUpgrade, level: u64) -> Result<Decimal, UpgradeError> {
        self.curve(upgrade)
            .cost(level)
            .ok_or(UpgradeError::CostOutOfRange { upgrade, level })
    }

    /// Price of a permanent upgrade.
    pub const fn permanent_cost(&self, upgrade: PermanentUpgrade) -> Decimal {
        match upgrade {
            PermanentUpgrade::Publication => self.permanent_costs.publication,
            PermanentUpgrade::BuyAll => self.permanent_costs.buy_all,
            PermanentUpgrade::AutoBuyer => self.permanent_costs.auto_buyer,
        }
    }

    /// Whether a permanent upgrade is owned.
    pub fn owns(&self, upgrade: PermanentUpgrade) -> bool {
        self.owned.contains(&upgrade)
    }

    /// Record ownership of a permanent upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::AlreadyOwned`] if it was already bought.
    pub fn grant(&mut self, upgrade: PermanentUpgrade) -> Result<(), UpgradeError> {
        if self.owned.insert(upgrade) {
            Ok(())
        } else {
            Err(UpgradeError::AlreadyOwned { upgrade })
        }
    }

    /// Permanent upgrades owned.
    pub const fn owned(&self) -> &BTreeSet<PermanentUpgrade> {
        &self.owned
    }

    /// Whether the autobuyer should act this tick.
    pub fn autobuyer_active(&self) -> bool {
        self.autobuyer_enabled && self.owns(PermanentUpgrade::AutoBuyer)
    }

    /// The raw autobuyer switch.
    pub const fn autobuyer_enabled(&self) -> bool {
        self.autobuyer_enabled
    }

    /// Flip the autobuyer switch.
    pub const fn set_autobuyer_enabled(&mut self, enabled: bool) {
        self.autobuyer_enabled = enabled;
    }
}

/// Value of a highest-weight coefficient at `level`: `c_i = level`.
pub fn coefficient(level: u64) -> Decimal {
    Decimal::from(level)
}

/// `\(c_1=<value>\)`.
pub fn regular_description(upgrade: RegularUpgrade, level: u64) -> String {
    markup::math(&coefficient_text(upgrade, level))
}

/// `\(c_1=<value>\rightarrow c_1=<value after amount>\)`.
pub fn regular_info(upgrade: RegularUpgrade, level: u64, amount: u64) -> String {
    let after = level.saturating_add(amount);
    markup::math_to(
        &coefficient_text(upgrade, level),
        &coefficient_text(upgrade, after),
    )
}

/// `c_i=<value>` without the math wrapper.
fn coefficient_text(upgrade: RegularUpgrade, level: u64) -> String {
    format!(
        "{}={}",
        upgrade.symbol(),
        markup::format_number(coefficient(level), 0)
    )
}

/// Description of a milestone for the given state.
pub fn milestone_description(milestone: Milestone, state: &ProgressionState) -> String {
    match milestone {
        Milestone::Rank => "Increases rank of Lie algebra".to_owned(),
        Milestone::AlgebraType => algebra_type_label(state).to_owned(),
    }
}

/// Info line of a milestone for the given state.
pub fn milestone_info(milestone: Milestone, state: &ProgressionState) -> String {
    match milestone {
        Milestone::Rank => markup::increase_info("n", "1"),
        Milestone::AlgebraType => algebra_type_label(state).to_owned(),
    }
}

/// "Unlock Type B" until the first algebra-type level, "Unlock Type G" after.
const fn algebra_type_label(state: &ProgressionState) -> &'static str {
    if state.alg_type_level() == 0 {
        "Unlock Type B"
    } else {
        "Unlock Type G"
    }
}

/// Description of a permanent upgrade.
pub fn permanent_description(upgrade: PermanentUpgrade) -> String {
    match upgrade {
        PermanentUpgrade::Publication => "Unlocks publications",
        PermanentUpgrade::BuyAll => "Unlocks buying all affordable levels",
        PermanentUpgrade::AutoBuyer => "Unlocks the auto-buyer",
    }
    .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn shipped_prices() {
        let book = UpgradeBook::new(&BalanceConfig::default());
        assert_eq!(book.next_cost(RegularUpgrade::C1, 0).unwrap(), Decimal::ZERO);
        assert_eq!(book.next_cost(RegularUpgrade::C1, 3).unwrap(), dec!(20));
        assert_eq!(book.next_cost(RegularUpgrade::C2, 0).unwrap(), dec!(5));
        assert_eq!(book.next_cost(RegularUpgrade::C2, 1).unwrap(), dec!(50));
        assert_eq!(
            book.permanent_cost(PermanentUpgrade::Publication),
            dec!(100)
        );
    }

    #[test]
    fn unrepresentable_price_is_an_error() {
        let book = UpgradeBook::new(&BalanceConfig::default());
        assert_eq!(
            book.next_cost(RegularUpgrade::C2, 500),
            Err(UpgradeError::CostOutOfRange {
                upgrade: RegularUpgrade::C2,
                level: 500
            })
        );
    }

    #[test]
    fn permanents_are_granted_once() {
        let mut book = UpgradeBook::new(&BalanceConfig::default());
        assert!(!book.owns(PermanentUpgrade::BuyAll));
        book.grant(PermanentUpgrade::BuyAll).unwrap();
        assert!(book.owns(PermanentUpgrade::BuyAll));
        assert_eq!(
            book.grant(PermanentUpgrade::BuyAll),
            Err(UpgradeError::AlreadyOwned {
                upgrade: PermanentUpgrade::BuyAll
            })
        );
    }

    #[test]
    fn autobuyer_needs_ownership_and_switch() {
        let mut book = UpgradeBook::new(&BalanceConfig::default());
        assert!(!book.autobuyer_active());
        book.grant(PermanentUpgrade::AutoBuyer).unwrap();
        assert!(book.autobuyer_active());
        book.set_autobuyer_enabled(false);
        assert!(!book.autobuyer_active());
    }

    #[test]
    fn regular_text() {
        assert_eq!(regular_description(RegularUpgrade::C1, 3), "\\(c_1=3\\)");
        assert_eq!(
            regular_info(RegularUpgrade::C2, 3, 2),
            "\\(c_2=3\\rightarrow c_2=5\\)"
        );
    }

    #[test]
    fn permanent_text() {
        assert_eq!(
            permanent_description(PermanentUpgrade::Publication),
            "Unlocks publications"
        );
        assert_eq!(
            permanent_description(PermanentUpgrade::AutoBuyer),
            "Unlocks the auto-buyer"
        );
    }

    #[test]
    fn algebra_type_text_tracks_level() {
        let rank_two = ProgressionState::from_levels(0, 0, 1, 0);
        assert_eq!(
            milestone_description(Milestone::AlgebraType, &rank_two),
            "Unlock Type B"
        );
        let type_b = ProgressionState::from_levels(0, 0, 1, 1);
        assert_eq!(
            milestone_info(Milestone::AlgebraType, &type_b),
            "Unlock Type G"
        );
        assert_eq!(
            milestone_info(Milestone::Rank, &type_b),
            "Increases \\(n\\) by \\(1\\)"
        );
    }
}
