//! Purchase strategies for headless runs.
//!
//! In the host a player clicks the upgrade panel. A headless run replaces
//! the player with a [`PurchaseStrategy`]: once per tick the runner shows
//! it the theory and executes the [`PurchaseAction`]s it returns through
//! [`apply_action`], the same entry points the host's buttons use.
//!
//! [`GreedyStrategy`] spends everything it can and publishes when the gain
//! is worth the reset. [`IdleStrategy`] never buys, which measures the
//! untouched growth rate.

use lie_theory_types::{Milestone, PermanentUpgrade, RegularUpgrade, UpgradeTarget};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{SimulationConfig, StrategyKind};
use crate::theory::LieTheory;
use crate::upgrade::UpgradeError;

/// One click on the host's upgrade panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PurchaseAction {
    /// Buy `amount` levels of a regular upgrade.
    BuyRegular {
        /// The upgrade.
        upgrade: RegularUpgrade,
        /// Levels to buy.
        amount: u64,
    },
    /// Buy as many levels of one regular upgrade as affordable.
    BuyMax {
        /// The upgrade.
        upgrade: RegularUpgrade,
    },
    /// The buy-all button (needs the buy-all permanent).
    BuyAll,
    /// Buy cheapest-first until nothing is affordable.
    BuyAffordable,
    /// Buy a permanent upgrade.
    BuyPermanent {
        /// The upgrade.
        upgrade: PermanentUpgrade,
    },
    /// Spend a milestone point.
    BuyMilestone {
        /// The milestone.
        milestone: Milestone,
    },
    /// Refund a milestone level.
    RefundMilestone {
        /// The milestone.
        milestone: Milestone,
    },
    /// Publish.
    Publish,
}

/// Execute one action against the theory.
///
/// Returns the number of regular levels bought (0 for actions that buy
/// none).
///
/// # Errors
///
/// Returns the [`UpgradeError`] of the underlying purchase.
pub fn apply_action(theory: &mut LieTheory, action: PurchaseAction) -> Result<u64, UpgradeError> {
    match action {
        PurchaseAction::BuyRegular { upgrade, amount } => {
            theory.buy(upgrade, amount)?;
            Ok(amount)
        }
        PurchaseAction::BuyMax { upgrade } => theory.buy_max(upgrade),
        PurchaseAction::BuyAll => theory.buy_all(),
        PurchaseAction::BuyAffordable => theory.buy_affordable(),
        PurchaseAction::BuyPermanent { upgrade } => theory.buy_permanent(upgrade).map(|()| 0),
        PurchaseAction::BuyMilestone { milestone } => theory.buy_milestone(milestone).map(|()| 0),
        PurchaseAction::RefundMilestone { milestone } => {
            theory.refund_milestone(milestone).map(|()| 0)
        }
        PurchaseAction::Publish => theory.publish().map(|_| 0),
    }
}

/// A source of purchase decisions.
pub trait PurchaseStrategy: Send {
    /// Actions to take before the given tick, in order.
    fn decide(&mut self, tick: u64, theory: &LieTheory) -> Vec<PurchaseAction>;
}

/// Build the strategy named in the configuration.
pub fn from_config(config: &SimulationConfig) -> Box<dyn PurchaseStrategy> {
    match config.strategy {
        StrategyKind::Greedy => Box::new(GreedyStrategy::new(
            config.publish_automatically,
            config.publish_ratio,
        )),
        StrategyKind::Idle => Box::new(IdleStrategy::new()),
    }
}

/// A strategy that never buys anything.
#[derive(Debug, Clone, Default)]
pub struct IdleStrategy;

impl IdleStrategy {
    /// Create a new idle strategy.
    pub const fn new() -> Self {
        Self
    }
}

impl PurchaseStrategy for IdleStrategy {
    fn decide(&mut self, _tick: u64, _theory: &LieTheory) -> Vec<PurchaseAction> {
        Vec::new()
    }
}

/// Spend every milestone point, buy permanents as soon as they are
/// affordable, publish when the multiplier would grow by `publish_ratio`,
/// and otherwise pour the balance into regular upgrades.
#[derive(Debug, Clone)]
pub struct GreedyStrategy {
    /// Whether publishing is allowed at all.
    publish: bool,
    /// Minimum `new bonus / current bonus` before publishing.
    publish_ratio: Decimal,
}

impl GreedyStrategy {
    /// Create a greedy strategy.
    pub const fn new(publish: bool, publish_ratio: Decimal) -> Self {
        Self {
            publish,
            publish_ratio,
        }
    }

    /// Whether publishing now clears the ratio.
    fn should_publish(&self, theory: &LieTheory) -> bool {
        if !self.publish {
            return false;
        }
        let Some(candidate) = theory.publication_preview() else {
            return false;
        };
        theory
            .publication_bonus()
            .checked_mul(self.publish_ratio)
            .is_some_and(|needed| candidate >= needed)
    }
}

impl PurchaseStrategy for GreedyStrategy {
    fn decide(&mut self, _tick: u64, theory: &LieTheory) -> Vec<PurchaseAction> {
        let mut actions = Vec::new();

        // Milestones cost no currency. Later milestones may only unlock
        // after an earlier one lands, so they are picked up next tick.
        let mut points = theory.unspent_milestone_points();
        for milestone in Milestone::ALL {
            let level = theory.progression().milestone_level(milestone);
            if points > 0
                && level < milestone.max_level()
                && theory.is_available(UpgradeTarget::Milestone(milestone))
            {
                actions.push(PurchaseAction::BuyMilestone { milestone });
                points = points.saturating_sub(1);
            }
        }

        if self.should_publish(theory) {
            actions.push(PurchaseAction::Publish);
            return actions;
        }

        let mut budget = theory.currency().value();
        for upgrade in PermanentUpgrade::ALL {
            let cost = theory.book().permanent_cost(upgrade);
            if !theory.book().owns(upgrade) && cost <= budget {
                actions.push(PurchaseAction::BuyPermanent { upgrade });
                budget = budget.checked_sub(cost).unwrap_or(Decimal::ZERO);
            }
        }

        actions.push(PurchaseAction::BuyAffordable);
        actions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::BalanceConfig;
    use crate::theory::Theory;

    fn funded(amount: Decimal) -> LieTheory {
        let mut theory = LieTheory::new(BalanceConfig::default());
        // One tick at A1 with c1 = 0 gains exactly elapsed · multiplier.
        theory.tick(amount, Decimal::ONE).unwrap();
        theory
    }

    #[test]
    fn idle_never_acts() {
        let theory = funded(dec!(1000));
        assert!(IdleStrategy::new().decide(0, &theory).is_empty());
    }

    #[test]
    fn greedy_spends_points_and_buys() {
        let theory = funded(dec!(200));
        let actions = GreedyStrategy::new(true, dec!(2)).decide(1, &theory);
        assert_eq!(
            actions,
            vec![
                PurchaseAction::BuyMilestone {
                    milestone: Milestone::Rank
                },
                PurchaseAction::BuyPermanent {
                    upgrade: PermanentUpgrade::Publication
                },
                PurchaseAction::BuyAffordable,
            ]
        );
    }

    #[test]
    fn greedy_publishes_when_worth_it() {
        let mut theory = funded(dec!(100));
        theory.buy_permanent(PermanentUpgrade::Publication).unwrap();
        theory.tick(dec!(100000000), Decimal::ONE).unwrap();

        let mut strategy = GreedyStrategy::new(true, dec!(2));
        let actions = strategy.decide(2, &theory);
        assert_eq!(actions.last(), Some(&PurchaseAction::Publish));

        let mut cautious = GreedyStrategy::new(false, dec!(2));
        assert!(!cautious.decide(2, &theory).contains(&PurchaseAction::Publish));
    }

    #[test]
    fn applied_actions_reach_the_theory() {
        let mut theory = funded(dec!(200));
        let actions = GreedyStrategy::new(false, dec!(2)).decide(1, &theory);
        for action in actions {
            apply_action(&mut theory, action).unwrap();
        }
        assert_eq!(theory.progression().rank_level(), 1);
        assert!(theory.book().owns(PermanentUpgrade::Publication));
        // 100 left: c1 costs 0 + 5 + 10 + 20 + 40, c2 costs 5.
        assert_eq!(theory.progression().c1_level(), 5);
        assert_eq!(theory.progression().c2_level(), 1);
        assert_eq!(theory.tau(), dec!(20));
    }

    #[test]
    fn action_serializes_with_tag() {
        let json = serde_json::to_string(&PurchaseAction::BuyMax {
            upgrade: RegularUpgrade::C1,
        })
        .unwrap();
        assert!(json.contains("\"action\":\"buy_max\""));
    }

    #[test]
    fn config_selects_strategy() {
        let config = SimulationConfig {
            strategy: StrategyKind::Idle,
            ..SimulationConfig::default()
        };
        let theory = funded(dec!(1000));
        assert!(from_config(&config).decide(0, &theory).is_empty());
    }
}
