//! End-to-end progression through the host contract.
//!
//! Drives a [`LieTheory`] the way a player would: tick, buy, spend
//! milestone points, publish, and finally hand the state to the host as a
//! snapshot.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::arithmetic_side_effects
)]

use lie_theory_core::config::{BalanceConfig, TheoryConfig};
use lie_theory_core::runner::{self, NoOpCallback, SimulationEndReason};
use lie_theory_core::strategy;
use lie_theory_core::theory::{LieTheory, Theory};
use lie_theory_types::{
    Milestone, PermanentUpgrade, RegularUpgrade, RootSystem, TheorySnapshot, UpgradeTarget,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tick `seconds` of game time in one step at speed 1.
fn wait(theory: &mut LieTheory, seconds: Decimal) {
    theory.tick(seconds, Decimal::ONE).unwrap();
}

#[test]
fn walk_through_every_root_system() {
    let mut theory = LieTheory::new(BalanceConfig::default());
    assert_eq!(theory.progression().root_system(), RootSystem::A1);
    assert!(theory.tertiary_equation().unwrap().contains("A_1"));

    // First c1 level is free; dim V = c1 + 1 = 2.
    theory.buy(RegularUpgrade::C1, 1).unwrap();
    wait(&mut theory, dec!(75));
    assert_eq!(theory.tau(), dec!(150));
    assert_eq!(theory.unspent_milestone_points(), 1);

    theory.buy_milestone(Milestone::Rank).unwrap();
    assert_eq!(theory.progression().root_system(), RootSystem::A2);
    assert!(theory.is_available(UpgradeTarget::Regular(RegularUpgrade::C2)));
    assert!(theory.tertiary_equation().unwrap().contains("A_2"));
    assert!(theory.secondary_equation().unwrap().contains("c_2"));

    // A2 at (1, 0): (c1+1)(c2+1)(c1+c2+2) = 2 · 1 · 3 = 6.
    let report = theory.tick(Decimal::ONE, Decimal::ONE).unwrap();
    assert_eq!(report.dimension, dec!(6));

    wait(&mut theory, dec!(2500));
    assert_eq!(theory.unspent_milestone_points(), 2);
    theory.buy_milestone(Milestone::AlgebraType).unwrap();
    assert_eq!(theory.progression().root_system(), RootSystem::B2);
    // B2 at (1, 0) is the 5-dimensional vector representation.
    assert_eq!(theory.progression().dimension().unwrap(), dec!(5));

    theory.buy_milestone(Milestone::AlgebraType).unwrap();
    assert_eq!(theory.progression().root_system(), RootSystem::G2);
    // G2 at (1, 0) is the 14-dimensional adjoint representation.
    assert_eq!(theory.progression().dimension().unwrap(), dec!(14));
    assert!(theory.tertiary_equation().unwrap().contains("G_2"));
    assert_eq!(theory.unspent_milestone_points(), 0);

    // Refunding rank falls back to A1 while keeping the algebra-type level.
    theory.refund_milestone(Milestone::Rank).unwrap();
    assert_eq!(theory.progression().root_system(), RootSystem::A1);
    assert_eq!(theory.progression().alg_type_level(), 2);
    assert!(!theory.is_available(UpgradeTarget::Milestone(Milestone::AlgebraType)));
    assert_eq!(theory.unspent_milestone_points(), 1);
}

#[test]
fn publication_cycle_grows_income() {
    let mut theory = LieTheory::new(BalanceConfig::default());
    wait(&mut theory, dec!(1000000));
    theory.buy_permanent(PermanentUpgrade::Publication).unwrap();

    let before = theory.tick(Decimal::ONE, Decimal::ONE).unwrap();
    let bonus = theory.publish().unwrap();
    let after = theory.tick(Decimal::ONE, Decimal::ONE).unwrap();

    assert!(bonus > Decimal::ONE);
    assert_eq!(after.dimension, before.dimension);
    assert_eq!(after.gained, before.gained * bonus);
    assert!(theory.publication_multiplier(dec!(1000000)).unwrap() > Decimal::ONE);
}

#[test]
fn snapshot_survives_json() {
    let mut theory = LieTheory::new(BalanceConfig::default());
    wait(&mut theory, dec!(20000));
    theory.buy_milestone(Milestone::Rank).unwrap();
    theory.buy(RegularUpgrade::C2, 2).unwrap();
    let snapshot = theory.snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: TheorySnapshot = serde_json::from_str(&json).unwrap();

    let mut restored = LieTheory::new(BalanceConfig::default());
    restored.restore(&decoded);
    assert_eq!(restored.progression(), theory.progression());
    assert_eq!(restored.tau(), theory.tau());
    assert_eq!(
        restored.secondary_equation().unwrap(),
        theory.secondary_equation().unwrap()
    );
}

#[tokio::test]
async fn configured_run_from_yaml() {
    let yaml = "\
simulation:
  tick_seconds: 1
  max_ticks: 500
  strategy: greedy
logging:
  summary_interval_ticks: 0
";
    let config = TheoryConfig::parse(yaml).unwrap();
    let mut theory = LieTheory::new(config.theory.clone());
    let mut strategy = strategy::from_config(&config.simulation);

    let result = runner::run_simulation(&mut theory, strategy.as_mut(), &config, &mut NoOpCallback)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 500);
    // 500 seconds of greedy play clears the first milestone threshold.
    assert!(result.max_tau >= dec!(150));
    assert_eq!(theory.progression().rank_level(), 1);
}
