//! Headless simulation loop.
//!
//! [`run_simulation`] plays the host's role for a theory: it owns the
//! [`TickClock`], asks a [`PurchaseStrategy`] what to click before every
//! tick, calls [`Theory::tick`], and stops on one of three conditions:
//!
//! - **Tick limit**: `simulation.max_ticks` ticks have run
//! - **Target tau**: tau reached `simulation.target_tau`
//! - **Currency ceiling**: the balance can no longer grow without leaving
//!   the representable range
//!
//! Rejected purchases are logged and counted, never fatal.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use lie_theory_types::GrowthReport;

use crate::clock::{ClockError, TickClock};
use crate::config::TheoryConfig;
use crate::currency::CurrencyError;
use crate::strategy::{self, PurchaseAction, PurchaseStrategy};
use crate::theory::{LieTheory, Theory, TheoryError};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The clock could not be created or advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A tick failed for a reason other than hitting the currency ceiling.
    #[error("theory error: {source}")]
    Theory {
        /// The underlying theory error.
        #[from]
        source: TheoryError,
    },
}

/// Why a simulation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Tau reached the configured target.
    TargetTauReached,
    /// The next tick's gain is not representable.
    CurrencyCeiling,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick number that just ran (1-based).
    pub tick: u64,
    /// Game seconds elapsed after this tick.
    pub game_seconds: Decimal,
    /// Growth reported by the theory.
    pub growth: GrowthReport,
    /// Strategy actions that succeeded.
    pub actions_applied: u32,
    /// Strategy actions the theory rejected.
    pub actions_rejected: u32,
    /// Regular levels bought, by the strategy and the autobuyer combined.
    pub levels_bought: u64,
    /// Whether a publication happened before this tick.
    pub published: bool,
    /// Publication multiplier in force during this tick.
    pub publication_bonus: Decimal,
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Publications performed.
    pub publications: u64,
    /// Tau at the end.
    pub final_tau: Decimal,
    /// Highest tau seen.
    pub max_tau: Decimal,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, theory: &LieTheory);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _theory: &LieTheory) {}
}

/// Counters for one tick's strategy actions.
#[derive(Debug, Default)]
struct ActionTally {
    applied: u32,
    rejected: u32,
    levels: u64,
    published: bool,
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if the clock is misconfigured or a tick fails
/// for a reason other than the currency ceiling.
pub async fn run_simulation(
    theory: &mut LieTheory,
    strategy: &mut dyn PurchaseStrategy,
    config: &TheoryConfig,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let simulation = &config.simulation;
    let mut clock = TickClock::new(simulation)?;
    let mut last_summary: Option<TickSummary> = None;
    let mut publications: u64 = 0;

    theory.set_autobuyer_enabled(simulation.autobuyer_enabled);

    info!(
        theory = theory.id(),
        run_id = %theory.run_id(),
        max_ticks = simulation.max_ticks,
        target_tau = ?simulation.target_tau,
        tick_seconds = %clock.tick_seconds(),
        speed_multiplier = %clock.speed_multiplier(),
        strategy = ?simulation.strategy,
        "Simulation starting"
    );

    let end_reason = loop {
        // --- Check target (before tick) ---
        if simulation
            .target_tau
            .is_some_and(|target| theory.tau() >= target)
        {
            info!(tick = clock.tick(), tau = %theory.tau(), "Target tau reached");
            break SimulationEndReason::TargetTauReached;
        }

        // --- Check tick limit (before tick) ---
        if simulation.max_ticks > 0 && clock.tick() >= simulation.max_ticks {
            info!(
                tick = clock.tick(),
                max_ticks = simulation.max_ticks,
                "Tick limit reached"
            );
            break SimulationEndReason::MaxTicksReached;
        }

        // --- Strategy ---
        let tally = apply_decisions(theory, strategy, clock.tick());
        if tally.published {
            publications = publications.saturating_add(1);
        }
        let levels_before = total_levels(theory);

        // --- Execute tick ---
        let growth = match theory.tick(clock.tick_seconds(), clock.speed_multiplier()) {
            Ok(growth) => growth,
            Err(
                err @ (TheoryError::ArithmeticOverflow
                | TheoryError::Dimension { .. }
                | TheoryError::Currency {
                    source: CurrencyError::Overflow { .. },
                }),
            ) => {
                warn!(tick = clock.tick(), error = %err, "Currency ceiling reached");
                break SimulationEndReason::CurrencyCeiling;
            }
            Err(err) => return Err(err.into()),
        };
        let tick = clock.advance()?;

        let levels_after = total_levels(theory);
        let summary = TickSummary {
            tick,
            game_seconds: clock.elapsed_seconds().unwrap_or(Decimal::MAX),
            growth,
            actions_applied: tally.applied,
            actions_rejected: tally.rejected,
            levels_bought: tally
                .levels
                .saturating_add(levels_after.saturating_sub(levels_before)),
            published: tally.published,
            publication_bonus: theory.publication_bonus(),
        };

        // --- Notify callback ---
        callback.on_tick(&summary, theory);

        if is_summary_tick(tick, config.logging.summary_interval_ticks) {
            info!(
                tick,
                tau = %summary.growth.currency,
                dimension = %summary.growth.dimension,
                root_system = %summary.growth.root_system,
                bonus = %summary.publication_bonus,
                milestone_points = theory.unspent_milestone_points(),
                next_milestone = ?theory.next_milestone_threshold(),
                "Progress"
            );
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        if simulation.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(
                simulation.tick_interval_ms,
            ))
            .await;
        }
    };

    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks: clock.tick(),
        publications,
        final_tau: theory.tau(),
        max_tau: theory.currency().max_value(),
    })
}

/// Ask the strategy for this tick's actions and execute them in order.
fn apply_decisions(
    theory: &mut LieTheory,
    strategy: &mut dyn PurchaseStrategy,
    tick: u64,
) -> ActionTally {
    let mut tally = ActionTally::default();
    for action in strategy.decide(tick, theory) {
        match strategy::apply_action(theory, action) {
            Ok(levels) => {
                tally.applied = tally.applied.saturating_add(1);
                tally.levels = tally.levels.saturating_add(levels);
                if action == PurchaseAction::Publish {
                    tally.published = true;
                }
            }
            Err(err) => {
                debug!(tick, ?action, error = %err, "Action rejected");
                tally.rejected = tally.rejected.saturating_add(1);
            }
        }
    }
    tally
}

/// Combined regular upgrade levels.
fn total_levels(theory: &LieTheory) -> u64 {
    let progression = theory.progression();
    progression
        .c1_level()
        .saturating_add(progression.c2_level())
}

/// Whether `tick` falls on the progress-log interval.
fn is_summary_tick(tick: u64, interval: u64) -> bool {
    interval > 0 && tick.checked_rem(interval) == Some(0)
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        publications = result.publications,
        final_tau = %result.final_tau,
        max_tau = %result.max_tau,
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            game_seconds = %summary.game_seconds,
            root_system = %summary.growth.root_system,
            dimension = %summary.growth.dimension,
            bonus = %summary.publication_bonus,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::{BalanceConfig, SimulationConfig, StrategyKind};
    use crate::strategy::{GreedyStrategy, IdleStrategy};

    fn config(simulation: SimulationConfig) -> TheoryConfig {
        TheoryConfig {
            simulation,
            ..TheoryConfig::default()
        }
    }

    struct CountingCallback {
        ticks: Vec<u64>,
    }

    impl TickCallback for CountingCallback {
        fn on_tick(&mut self, summary: &TickSummary, _theory: &LieTheory) {
            self.ticks.push(summary.tick);
        }
    }

    #[tokio::test]
    async fn idle_run_stops_at_tick_limit() {
        let mut theory = LieTheory::new(BalanceConfig::default());
        let config = config(SimulationConfig {
            max_ticks: 10,
            strategy: StrategyKind::Idle,
            ..SimulationConfig::default()
        });
        let mut callback = CountingCallback { ticks: Vec::new() };

        let result = run_simulation(&mut theory, &mut IdleStrategy::new(), &config, &mut callback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 10);
        assert_eq!(result.final_tau, dec!(1.0));
        assert_eq!(callback.ticks, (1..=10).collect::<Vec<_>>());
        let summary = result.final_summary.unwrap();
        assert_eq!(summary.game_seconds, dec!(1.0));
        assert_eq!(summary.levels_bought, 0);
    }

    #[tokio::test]
    async fn greedy_run_reaches_target() {
        let mut theory = LieTheory::new(BalanceConfig::default());
        let config = config(SimulationConfig {
            tick_seconds: dec!(1),
            max_ticks: 10_000,
            target_tau: Some(dec!(50)),
            ..SimulationConfig::default()
        });
        let mut strategy = GreedyStrategy::new(true, dec!(2));

        let result = run_simulation(&mut theory, &mut strategy, &config, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::TargetTauReached);
        assert!(result.final_tau >= dec!(50));
        assert!(theory.progression().c1_level() > 0);
    }

    #[tokio::test]
    async fn overflow_ends_run_at_ceiling() {
        let mut theory = LieTheory::new(BalanceConfig::default());
        let config = config(SimulationConfig {
            tick_seconds: dec!(1),
            speed_multiplier: Decimal::MAX,
            strategy: StrategyKind::Idle,
            ..SimulationConfig::default()
        });

        let result = run_simulation(&mut theory, &mut IdleStrategy::new(), &config, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::CurrencyCeiling);
        assert_eq!(result.total_ticks, 1);
        assert_eq!(result.final_tau, Decimal::MAX);
    }

    #[tokio::test]
    async fn target_already_met_runs_nothing() {
        let mut theory = LieTheory::new(BalanceConfig::default());
        let config = config(SimulationConfig {
            target_tau: Some(Decimal::ZERO),
            ..SimulationConfig::default()
        });

        let result = run_simulation(&mut theory, &mut IdleStrategy::new(), &config, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::TargetTauReached);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[test]
    fn summary_interval() {
        assert!(is_summary_tick(600, 600));
        assert!(!is_summary_tick(601, 600));
        assert!(!is_summary_tick(600, 0));
    }
}
