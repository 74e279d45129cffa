//! Progression state and the milestone state machine.
//!
//! [`ProgressionState`] is the explicit record of the four levels that drive
//! the theory: the two highest-weight coefficients and the two milestones.
//! Milestone changes go through [`ProgressionState::apply`], which returns the
//! next state together with the [`Effect`]s the host must act on (equation
//! invalidation, availability flags, description updates). Nothing is mutated
//! behind the caller's back.
//!
//! The active [`RootSystem`] is cached in the record and recomputed only when
//! a milestone transition changes it, so the per-tick path never re-branches
//! on raw levels.

use lie_theory_types::{Equation, Milestone, RegularUpgrade, RootSystem, UpgradeTarget};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dimension::{self, DimensionError};

/// Errors from milestone transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// The milestone is already at its maximum level.
    #[error("{milestone:?} is already at its maximum level {max_level}")]
    AtMaxLevel {
        /// The milestone.
        milestone: Milestone,
        /// Its level cap.
        max_level: u64,
    },

    /// The milestone is at level 0 and cannot be refunded.
    #[error("{milestone:?} is at level 0 and cannot be refunded")]
    AtMinLevel {
        /// The milestone.
        milestone: Milestone,
    },

    /// The milestone is not currently available for interaction.
    #[error("{milestone:?} is not available")]
    Unavailable {
        /// The milestone.
        milestone: Milestone,
    },
}

/// A requested milestone change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneTransition {
    /// Raise the milestone by one level.
    Buy(Milestone),
    /// Lower the milestone by one level.
    Refund(Milestone),
}

impl MilestoneTransition {
    /// The milestone this transition targets.
    pub const fn milestone(self) -> Milestone {
        match self {
            Self::Buy(m) | Self::Refund(m) => m,
        }
    }
}

/// A side effect the owner of the state must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The rendered text of this equation is stale.
    InvalidateEquation(Equation),
    /// Set the availability flag of an upgrade.
    SetAvailability {
        /// The upgrade whose flag changes.
        target: UpgradeTarget,
        /// The new flag value.
        available: bool,
    },
    /// The description/info text of this milestone changed.
    DescriptionChanged(Milestone),
}

/// Result of a successful milestone transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state after the transition.
    pub state: ProgressionState,
    /// Effects to apply, in order.
    pub effects: Vec<Effect>,
}

/// Levels that drive the theory, plus the root system they select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Level of `c1`.
    c1_level: u64,
    /// Level of `c2`.
    c2_level: u64,
    /// Rank milestone level (0 or 1).
    rank_level: u64,
    /// Algebra-type milestone level (0, 1 or 2).
    alg_type_level: u64,
    /// Root system selected by the milestone levels.
    root_system: RootSystem,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Fresh state: every level 0, `A1` active.
    pub const fn new() -> Self {
        Self {
            c1_level: 0,
            c2_level: 0,
            rank_level: 0,
            alg_type_level: 0,
            root_system: RootSystem::A1,
        }
    }

    /// Rebuild a state from stored levels (e.g. a host snapshot).
    ///
    /// Milestone levels above their caps are clamped.
    pub fn from_levels(c1_level: u64, c2_level: u64, rank_level: u64, alg_type_level: u64) -> Self {
        let rank_level = rank_level.min(Milestone::Rank.max_level());
        let alg_type_level = alg_type_level.min(Milestone::AlgebraType.max_level());
        Self {
            c1_level,
            c2_level,
            rank_level,
            alg_type_level,
            root_system: RootSystem::select(rank_level, alg_type_level),
        }
    }

    /// Level of `c1`.
    pub const fn c1_level(&self) -> u64 {
        self.c1_level
    }

    /// Level of `c2`.
    pub const fn c2_level(&self) -> u64 {
        self.c2_level
    }

    /// Rank milestone level.
    pub const fn rank_level(&self) -> u64 {
        self.rank_level
    }

    /// Algebra-type milestone level.
    pub const fn alg_type_level(&self) -> u64 {
        self.alg_type_level
    }

    /// The active root system.
    pub const fn root_system(&self) -> RootSystem {
        self.root_system
    }

    /// Level of a regular upgrade.
    pub const fn regular_level(&self, upgrade: RegularUpgrade) -> u64 {
        match upgrade {
            RegularUpgrade::C1 => self.c1_level,
            RegularUpgrade::C2 => self.c2_level,
        }
    }

    /// Level of a milestone.
    pub const fn milestone_level(&self, milestone: Milestone) -> u64 {
        match milestone {
            Milestone::Rank => self.rank_level,
            Milestone::AlgebraType => self.alg_type_level,
        }
    }

    /// Whether the rank-2 content (`c2`, algebra type) is unlocked.
    pub const fn rank_two_unlocked(&self) -> bool {
        self.rank_level > 0
    }

    /// Whether the host should let the player interact with `target`.
    ///
    /// `c2` and the algebra-type milestone share one rule: available iff
    /// rank > 0. Everything else is always available.
    pub const fn is_available(&self, target: UpgradeTarget) -> bool {
        match target {
            UpgradeTarget::Regular(RegularUpgrade::C2)
            | UpgradeTarget::Milestone(Milestone::AlgebraType) => self.rank_two_unlocked(),
            UpgradeTarget::Regular(RegularUpgrade::C1)
            | UpgradeTarget::Milestone(Milestone::Rank) => true,
        }
    }

    /// Raise a regular upgrade by `amount` levels.
    ///
    /// Returns `None` if the level would overflow.
    pub fn with_regular_raised(self, upgrade: RegularUpgrade, amount: u64) -> Option<Self> {
        let mut next = self;
        match upgrade {
            RegularUpgrade::C1 => next.c1_level = self.c1_level.checked_add(amount)?,
            RegularUpgrade::C2 => next.c2_level = self.c2_level.checked_add(amount)?,
        }
        Some(next)
    }

    /// Reset both regular upgrades to level 0 (publication).
    pub const fn with_regular_reset(self) -> Self {
        Self {
            c1_level: 0,
            c2_level: 0,
            ..self
        }
    }

    /// Dimension of the active representation, the per-second growth rate.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::Overflow`] if the value is not representable.
    pub fn dimension(&self) -> Result<Decimal, DimensionError> {
        dimension::system_dimension(self.root_system, self.c1_level, self.c2_level)
    }

    /// Apply a milestone transition.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError`] if the milestone is at a bound or the
    /// algebra type is touched while rank is 0.
    pub fn apply(self, transition: MilestoneTransition) -> Result<Transition, ProgressionError> {
        let milestone = transition.milestone();
        if !self.is_available(UpgradeTarget::Milestone(milestone)) {
            return Err(ProgressionError::Unavailable { milestone });
        }

        let current = self.milestone_level(milestone);
        let next_level = match transition {
            MilestoneTransition::Buy(_) => {
                let max_level = milestone.max_level();
                if current >= max_level {
                    return Err(ProgressionError::AtMaxLevel {
                        milestone,
                        max_level,
                    });
                }
                current.saturating_add(1)
            }
            MilestoneTransition::Refund(_) => current
                .checked_sub(1)
                .ok_or(ProgressionError::AtMinLevel { milestone })?,
        };

        let mut state = self;
        match milestone {
            Milestone::Rank => state.rank_level = next_level,
            Milestone::AlgebraType => state.alg_type_level = next_level,
        }
        state.root_system = RootSystem::select(state.rank_level, state.alg_type_level);

        let effects = match milestone {
            Milestone::Rank => {
                let available = state.rank_two_unlocked();
                vec![
                    Effect::InvalidateEquation(Equation::Primary),
                    Effect::InvalidateEquation(Equation::Secondary),
                    Effect::InvalidateEquation(Equation::Tertiary),
                    Effect::SetAvailability {
                        target: UpgradeTarget::Milestone(Milestone::AlgebraType),
                        available,
                    },
                    Effect::SetAvailability {
                        target: UpgradeTarget::Regular(RegularUpgrade::C2),
                        available,
                    },
                ]
            }
            Milestone::AlgebraType => vec![
                Effect::InvalidateEquation(Equation::Primary),
                Effect::InvalidateEquation(Equation::Tertiary),
                Effect::DescriptionChanged(Milestone::AlgebraType),
            ],
        };

        Ok(Transition { state, effects })
    }
}
