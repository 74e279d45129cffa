//! The theory lifecycle: the host contract and the Lie Theory implementation.
//!
//! The host drives a theory through a fixed set of callbacks: [`Theory::init`]
//! once at load, [`Theory::tick`] once per frame, and the equation/publication
//! getters whenever it redraws. [`LieTheory`] implements that contract on top
//! of an explicit [`ProgressionState`] record; purchases, refunds and
//! publications are inherent methods the host's upgrade panel calls.
//!
//! # Tick
//!
//! ```text
//! rho += elapsed · multiplier · publication_bonus · dim V(λ)
//! ```
//!
//! followed by invalidation of the tertiary equation (it shows the live
//! dimension) and, if owned and switched on, one autobuyer pass.

use std::collections::BTreeMap;

use chrono::Utc;
use lie_theory_types::{
    Equation, GrowthReport, Milestone, PermanentUpgrade, PermanentView, RegularUpgrade, RunId,
    TheorySnapshot, UpgradeTarget, UpgradeView,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::BalanceConfig;
use crate::cost::MAX_BULK_LEVELS;
use crate::currency::{Currency, CurrencyError};
use crate::dimension::DimensionError;
use crate::equations::{self, EquationCache, THEORY_SYMBOL};
use crate::milestone::MilestoneSchedule;
use crate::progression::{Effect, MilestoneTransition, ProgressionState};
use crate::publication::{self, Publication};
use crate::upgrade::{self, UpgradeBook, UpgradeError};

/// Errors surfaced through the host contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TheoryError {
    /// The dimension could not be evaluated.
    #[error("dimension error: {source}")]
    Dimension {
        /// The underlying dimension error.
        #[from]
        source: DimensionError,
    },

    /// The currency could not absorb the tick's gain.
    #[error("currency error: {source}")]
    Currency {
        /// The underlying currency error.
        #[from]
        source: CurrencyError,
    },

    /// The tick's gain could not be computed.
    #[error("arithmetic overflow computing tick gain")]
    ArithmeticOverflow,
}

/// Lifecycle and display contract every theory offers the host.
pub trait Theory {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Display name.
    fn name(&self) -> &'static str;

    /// Flavour text shown on the theory card.
    fn description(&self) -> &'static str;

    /// Credits.
    fn authors(&self) -> &'static str;

    /// Content version.
    fn version(&self) -> u32;

    /// Create currency and upgrades and put the theory in its fresh state.
    fn init(&mut self);

    /// Advance by `elapsed_time` seconds at host speed `multiplier`.
    ///
    /// # Errors
    ///
    /// Returns [`TheoryError`] if the gain cannot be computed or stored.
    fn tick(
        &mut self,
        elapsed_time: Decimal,
        multiplier: Decimal,
    ) -> Result<GrowthReport, TheoryError>;

    /// Top equation slot.
    ///
    /// # Errors
    ///
    /// Returns [`TheoryError`] if rendering fails.
    fn primary_equation(&mut self) -> Result<String, TheoryError>;

    /// Middle equation slot.
    ///
    /// # Errors
    ///
    /// Returns [`TheoryError`] if rendering fails.
    fn secondary_equation(&mut self) -> Result<String, TheoryError>;

    /// Bottom equation slot.
    ///
    /// # Errors
    ///
    /// Returns [`TheoryError`] if rendering fails.
    fn tertiary_equation(&mut self) -> Result<String, TheoryError>;

    /// Multiplier a publication at `tau` would grant.
    fn publication_multiplier(&self, tau: Decimal) -> Option<Decimal>;

    /// LaTeX of the publication formula with `symbol` standing for tau.
    fn publication_multiplier_formula(&self, symbol: &str) -> String;

    /// The theory's tau value.
    fn tau(&self) -> Decimal;

    /// Value plotted on the host's 2D graph.
    fn graph_value_2d(&self) -> f64;
}

/// The Lie Theory theory.
#[derive(Debug, Clone)]
pub struct LieTheory {
    /// Balance the theory was created with; `init` restores from it.
    balance: BalanceConfig,
    /// The four driving levels.
    progression: ProgressionState,
    /// rho.
    currency: Currency,
    /// Prices and permanent ownership.
    book: UpgradeBook,
    /// Milestone point thresholds.
    milestones: MilestoneSchedule,
    /// Publication bonus bookkeeping.
    publication: Publication,
    /// Rendered equation text.
    equations: EquationCache,
    /// Availability flags as last pushed to the host.
    availability: BTreeMap<UpgradeTarget, bool>,
    /// Milestone `(description, info)` as last pushed to the host.
    milestone_text: BTreeMap<Milestone, (String, String)>,
    /// Ticks processed since `init`.
    ticks: u64,
    /// Identifier of this run.
    run_id: RunId,
}

impl LieTheory {
    /// Stable identifier.
    pub const ID: &'static str = "lie_theory_JH";

    /// Display name.
    pub const NAME: &'static str = "Lie Theory";

    /// Flavour text.
    pub const DESCRIPTION: &'static str = "You are interested in representations of Lie algebras. \
         So you decide to start probing into how big they can get.";

    /// Credits.
    pub const AUTHORS: &'static str = "Jackson Hopper";

    /// Content version.
    pub const VERSION: u32 = 1;

    /// Create and initialise a theory with the given balance.
    pub fn new(balance: BalanceConfig) -> Self {
        let mut theory = Self {
            book: UpgradeBook::new(&balance),
            milestones: MilestoneSchedule::new(balance.milestone_thresholds.clone()),
            publication: Publication::new(balance.publication),
            balance,
            progression: ProgressionState::new(),
            currency: Currency::new(),
            equations: EquationCache::new(),
            availability: BTreeMap::new(),
            milestone_text: BTreeMap::new(),
            ticks: 0,
            run_id: RunId::new(),
        };
        theory.init();
        theory
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The progression record.
    pub const fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    /// rho.
    pub const fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Prices and ownership.
    pub const fn book(&self) -> &UpgradeBook {
        &self.book
    }

    /// Current publication bonus.
    pub const fn publication_bonus(&self) -> Decimal {
        self.publication.bonus()
    }

    /// Milestone points earned and not spent.
    pub fn unspent_milestone_points(&self) -> u64 {
        self.milestones
            .unspent(self.currency.max_value(), &self.progression)
    }

    /// Tau needed for the next milestone point.
    pub fn next_milestone_threshold(&self) -> Option<Decimal> {
        self.milestones.next_threshold(self.currency.max_value())
    }

    /// Ticks processed since `init`.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Identifier of this run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Host availability flag of an upgrade.
    pub fn is_available(&self, target: UpgradeTarget) -> bool {
        self.availability.get(&target).copied().unwrap_or(true)
    }

    /// Current description of a milestone.
    pub fn milestone_description(&self, milestone: Milestone) -> String {
        self.milestone_text
            .get(&milestone)
            .map_or_else(
                || upgrade::milestone_description(milestone, &self.progression),
                |(description, _)| description.clone(),
            )
    }

    /// Current info line of a milestone.
    pub fn milestone_info(&self, milestone: Milestone) -> String {
        self.milestone_text
            .get(&milestone)
            .map_or_else(
                || upgrade::milestone_info(milestone, &self.progression),
                |(_, info)| info.clone(),
            )
    }

    /// Switch the autobuyer on or off.
    pub const fn set_autobuyer_enabled(&mut self, enabled: bool) {
        self.book.set_autobuyer_enabled(enabled);
    }

    // -----------------------------------------------------------------------
    // Purchases
    // -----------------------------------------------------------------------

    /// Buy `amount` levels of a regular upgrade, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError`] if the upgrade is unavailable, a price is out
    /// of range, or the balance is too low.
    pub fn buy(&mut self, upgrade: RegularUpgrade, amount: u64) -> Result<Decimal, UpgradeError> {
        let target = UpgradeTarget::Regular(upgrade);
        if !self.is_available(target) {
            return Err(UpgradeError::Unavailable { target });
        }
        let level = self.progression.regular_level(upgrade);
        let price = self
            .book
            .curve(upgrade)
            .total_cost(level, amount)
            .ok_or(UpgradeError::CostOutOfRange { upgrade, level })?;
        let next = self
            .progression
            .with_regular_raised(upgrade, amount)
            .ok_or(UpgradeError::LevelOverflow { upgrade })?;

        self.currency.spend(price)?;
        self.progression = next;
        debug!(?upgrade, amount, %price, level = next.regular_level(upgrade), "Upgrade bought");
        Ok(price)
    }

    /// Buy as many levels of `upgrade` as the balance allows.
    ///
    /// Returns the number of levels bought.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::Unavailable`] if the upgrade is locked.
    pub fn buy_max(&mut self, upgrade: RegularUpgrade) -> Result<u64, UpgradeError> {
        let target = UpgradeTarget::Regular(upgrade);
        if !self.is_available(target) {
            return Err(UpgradeError::Unavailable { target });
        }
        let level = self.progression.regular_level(upgrade);
        let (count, _) = self
            .book
            .curve(upgrade)
            .max_affordable(level, self.currency.value());
        if count == 0 {
            return Ok(0);
        }
        self.buy(upgrade, count)?;
        Ok(count)
    }

    /// Buy the maximum of every available regular upgrade, as the buy-all
    /// button does.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::NotOwned`] without the buy-all upgrade.
    pub fn buy_all(&mut self) -> Result<u64, UpgradeError> {
        if !self.book.owns(PermanentUpgrade::BuyAll) {
            return Err(UpgradeError::NotOwned {
                upgrade: PermanentUpgrade::BuyAll,
            });
        }
        self.buy_affordable()
    }

    /// Repeatedly buy the cheapest affordable level among available regular
    /// upgrades. Returns the number of levels bought.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError`] if a purchase unexpectedly fails.
    pub fn buy_affordable(&mut self) -> Result<u64, UpgradeError> {
        let mut bought: u64 = 0;
        while bought < MAX_BULK_LEVELS {
            let Some(upgrade) = self.cheapest_affordable() else {
                break;
            };
            self.buy(upgrade, 1)?;
            bought = bought.saturating_add(1);
        }
        Ok(bought)
    }

    /// The available regular upgrade with the lowest next price, if the
    /// balance covers it.
    pub fn cheapest_affordable(&self) -> Option<RegularUpgrade> {
        RegularUpgrade::ALL
            .iter()
            .copied()
            .filter(|u| self.is_available(UpgradeTarget::Regular(*u)))
            .filter_map(|u| {
                let level = self.progression.regular_level(u);
                self.book.next_cost(u, level).ok().map(|cost| (u, cost))
            })
            .filter(|(_, cost)| *cost >= Decimal::ZERO && self.currency.can_afford(*cost))
            .min_by(|a, b| a.1.cmp(&b.1))
            .map(|(u, _)| u)
    }

    /// Buy a permanent upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::AlreadyOwned`] or a currency error.
    pub fn buy_permanent(&mut self, upgrade: PermanentUpgrade) -> Result<(), UpgradeError> {
        if self.book.owns(upgrade) {
            return Err(UpgradeError::AlreadyOwned { upgrade });
        }
        let price = self.book.permanent_cost(upgrade);
        self.currency.spend(price)?;
        self.book.grant(upgrade)?;
        info!(?upgrade, %price, "Permanent upgrade bought");
        Ok(())
    }

    /// Spend a milestone point on `milestone`.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::NoMilestonePoints`] if none are free, or the
    /// progression error if the transition is not allowed.
    pub fn buy_milestone(&mut self, milestone: Milestone) -> Result<(), UpgradeError> {
        if self.unspent_milestone_points() == 0 {
            return Err(UpgradeError::NoMilestonePoints { milestone });
        }
        self.transition(MilestoneTransition::Buy(milestone))
    }

    /// Refund one level of `milestone`, returning its point.
    ///
    /// # Errors
    ///
    /// Returns the progression error if the transition is not allowed.
    pub fn refund_milestone(&mut self, milestone: Milestone) -> Result<(), UpgradeError> {
        self.transition(MilestoneTransition::Refund(milestone))
    }

    /// Apply a milestone transition and carry out its effects.
    fn transition(&mut self, transition: MilestoneTransition) -> Result<(), UpgradeError> {
        let result = self.progression.apply(transition)?;
        self.progression = result.state;
        self.apply_effects(&result.effects);
        info!(
            ?transition,
            rank = self.progression.rank_level(),
            alg_type = self.progression.alg_type_level(),
            root_system = %self.progression.root_system(),
            "Milestone changed"
        );
        Ok(())
    }

    /// Carry out effects emitted by a transition.
    fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::InvalidateEquation(equation) => self.equations.invalidate(equation),
                Effect::SetAvailability { target, available } => {
                    self.availability.insert(target, available);
                }
                Effect::DescriptionChanged(milestone) => self.refresh_milestone_text(milestone),
            }
        }
    }

    /// Re-derive every availability flag from the progression record.
    fn update_availability(&mut self) {
        for target in [
            UpgradeTarget::Regular(RegularUpgrade::C1),
            UpgradeTarget::Regular(RegularUpgrade::C2),
            UpgradeTarget::Milestone(Milestone::Rank),
            UpgradeTarget::Milestone(Milestone::AlgebraType),
        ] {
            self.availability
                .insert(target, self.progression.is_available(target));
        }
    }

    /// Re-derive one milestone's description and info.
    fn refresh_milestone_text(&mut self, milestone: Milestone) {
        self.milestone_text.insert(
            milestone,
            (
                upgrade::milestone_description(milestone, &self.progression),
                upgrade::milestone_info(milestone, &self.progression),
            ),
        );
    }

    // -----------------------------------------------------------------------
    // Publication
    // -----------------------------------------------------------------------

    /// The bonus publishing now would give, if it is an improvement and
    /// publishing is unlocked.
    pub fn publication_preview(&self) -> Option<Decimal> {
        if !self.book.owns(PermanentUpgrade::Publication) {
            return None;
        }
        self.publication.improvement(self.tau())
    }

    /// Publish: bank the multiplier for the current tau, then reset the
    /// currency and regular upgrades. Milestones, permanents and the tau
    /// high-water mark are kept.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::NotOwned`] before publications are unlocked,
    /// or [`UpgradeError::NoImprovement`] if the bonus would not grow.
    pub fn publish(&mut self) -> Result<Decimal, UpgradeError> {
        if !self.book.owns(PermanentUpgrade::Publication) {
            return Err(UpgradeError::NotOwned {
                upgrade: PermanentUpgrade::Publication,
            });
        }
        let tau = self.tau();
        let bonus = self
            .publication
            .publish(tau)
            .ok_or(UpgradeError::NoImprovement)?;
        self.currency.reset();
        self.progression = self.progression.with_regular_reset();
        self.equations.invalidate_all();
        info!(%tau, %bonus, tick = self.ticks, "Published");
        Ok(bonus)
    }

    // -----------------------------------------------------------------------
    // Host display
    // -----------------------------------------------------------------------

    /// Display state of every upgrade, in host order.
    pub fn upgrade_views(&self) -> Vec<UpgradeView> {
        let regular = RegularUpgrade::ALL.iter().map(|u| {
            let level = self.progression.regular_level(*u);
            UpgradeView {
                target: UpgradeTarget::Regular(*u),
                index: u.id().index(),
                level,
                max_level: None,
                available: self.is_available(UpgradeTarget::Regular(*u)),
                description: upgrade::regular_description(*u, level),
                info: upgrade::regular_info(*u, level, 1),
                cost: self.book.next_cost(*u, level).ok(),
            }
        });
        let milestones = Milestone::ALL.iter().map(|m| UpgradeView {
            target: UpgradeTarget::Milestone(*m),
            index: m.id().index(),
            level: self.progression.milestone_level(*m),
            max_level: Some(m.max_level()),
            available: self.is_available(UpgradeTarget::Milestone(*m)),
            description: self.milestone_description(*m),
            info: self.milestone_info(*m),
            cost: None,
        });
        regular.chain(milestones).collect()
    }

    /// Display state of every permanent upgrade, in host order.
    pub fn permanent_views(&self) -> Vec<PermanentView> {
        PermanentUpgrade::ALL
            .iter()
            .map(|p| PermanentView {
                id: p.id(),
                upgrade: *p,
                owned: self.book.owns(*p),
                description: upgrade::permanent_description(*p),
                cost: self.book.permanent_cost(*p),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Persistence hand-off
    // -----------------------------------------------------------------------

    /// Capture the persistable state.
    pub fn snapshot(&self) -> TheorySnapshot {
        TheorySnapshot {
            run_id: self.run_id,
            saved_at: Utc::now(),
            ticks: self.ticks,
            c1_level: self.progression.c1_level(),
            c2_level: self.progression.c2_level(),
            rank_level: self.progression.rank_level(),
            alg_type_level: self.progression.alg_type_level(),
            currency: self.currency.value(),
            max_tau: self.currency.max_value(),
            publication_bonus: self.publication.bonus(),
            permanents: self.book.owned().clone(),
            autobuyer_enabled: self.book.autobuyer_enabled(),
        }
    }

    /// Replace the current state with a snapshot.
    pub fn restore(&mut self, snapshot: &TheorySnapshot) {
        self.progression = ProgressionState::from_levels(
            snapshot.c1_level,
            snapshot.c2_level,
            snapshot.rank_level,
            snapshot.alg_type_level,
        );
        self.currency = Currency::from_parts(snapshot.currency, snapshot.max_tau);
        self.publication =
            Publication::with_bonus(self.balance.publication, snapshot.publication_bonus);
        self.book = UpgradeBook::new(&self.balance);
        for permanent in &snapshot.permanents {
            if let Err(err) = self.book.grant(*permanent) {
                debug!(error = %err, "Duplicate permanent in snapshot");
            }
        }
        self.book.set_autobuyer_enabled(snapshot.autobuyer_enabled);
        self.ticks = snapshot.ticks;
        self.run_id = snapshot.run_id;
        self.refresh_host_state();
        info!(
            run_id = %self.run_id,
            ticks = self.ticks,
            root_system = %self.progression.root_system(),
            "Theory restored from snapshot"
        );
    }

    /// Re-push availability, milestone text and equations after a bulk
    /// state change.
    fn refresh_host_state(&mut self) {
        self.update_availability();
        for milestone in Milestone::ALL {
            self.refresh_milestone_text(milestone);
        }
        self.equations.invalidate_all();
    }

    /// Compute `elapsed · multiplier · bonus · dimension`.
    fn tick_gain(
        &self,
        elapsed_time: Decimal,
        multiplier: Decimal,
        dimension: Decimal,
    ) -> Result<Decimal, TheoryError> {
        elapsed_time
            .checked_mul(multiplier)
            .and_then(|dt| dt.checked_mul(self.publication.bonus()))
            .and_then(|rate| rate.checked_mul(dimension))
            .ok_or(TheoryError::ArithmeticOverflow)
    }
}

impl Default for LieTheory {
    fn default() -> Self {
        Self::new(BalanceConfig::default())
    }
}

impl Theory for LieTheory {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn authors(&self) -> &'static str {
        Self::AUTHORS
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn init(&mut self) {
        self.progression = ProgressionState::new();
        self.currency = Currency::new();
        self.book = UpgradeBook::new(&self.balance);
        self.milestones = MilestoneSchedule::new(self.balance.milestone_thresholds.clone());
        self.publication = Publication::new(self.balance.publication);
        self.ticks = 0;
        self.refresh_host_state();
        info!(id = Self::ID, run_id = %self.run_id, "Theory initialised");
    }

    fn tick(
        &mut self,
        elapsed_time: Decimal,
        multiplier: Decimal,
    ) -> Result<GrowthReport, TheoryError> {
        let dimension = self.progression.dimension()?;
        let gained = self.tick_gain(elapsed_time, multiplier, dimension)?;
        let currency = self.currency.add(gained)?;
        self.equations.invalidate(Equation::Tertiary);

        // The gain is already banked; a failed autobuyer pass must not undo it.
        if self.book.autobuyer_active() {
            match self.buy_affordable() {
                Ok(0) => {}
                Ok(bought) => debug!(bought, tick = self.ticks, "Autobuyer purchased levels"),
                Err(err) => warn!(error = %err, tick = self.ticks, "Autobuyer purchase rejected"),
            }
        }

        self.ticks = self.ticks.saturating_add(1);
        Ok(GrowthReport {
            root_system: self.progression.root_system(),
            dimension,
            gained,
            currency,
        })
    }

    fn primary_equation(&mut self) -> Result<String, TheoryError> {
        self.equations
            .get_or_render(Equation::Primary, || Ok(equations::render_primary()))
    }

    fn secondary_equation(&mut self) -> Result<String, TheoryError> {
        let state = self.progression;
        self.equations.get_or_render(Equation::Secondary, || {
            Ok(equations::render_secondary(THEORY_SYMBOL, &state))
        })
    }

    fn tertiary_equation(&mut self) -> Result<String, TheoryError> {
        let state = self.progression;
        self.equations.get_or_render(Equation::Tertiary, || {
            equations::render_tertiary(&state).map_err(TheoryError::from)
        })
    }

    fn publication_multiplier(&self, tau: Decimal) -> Option<Decimal> {
        self.publication.formula().multiplier(tau)
    }

    fn publication_multiplier_formula(&self, symbol: &str) -> String {
        self.publication.formula().formula(symbol)
    }

    fn tau(&self) -> Decimal {
        self.currency.value()
    }

    fn graph_value_2d(&self) -> f64 {
        publication::graph_value(self.currency.value())
    }
}
