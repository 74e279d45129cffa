//! Enumeration types for the Lie Theory theory.
//!
//! Root systems, display equations, and the fixed upgrade catalogue. Every
//! enum that names a host object knows its host index so the mapping lives
//! in exactly one place.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{MilestoneId, PermanentId, UpgradeId};

// ---------------------------------------------------------------------------
// Root systems
// ---------------------------------------------------------------------------

/// A positive root, written in the basis of simple roots.
///
/// The vector length always equals the rank of the owning root system.
pub type Root = &'static [u32];

/// Positive roots of `A1`.
const A1_ROOTS: &[Root] = &[&[1]];

/// Positive roots of `A2`.
const A2_ROOTS: &[Root] = &[&[1, 0], &[0, 1], &[1, 1]];

/// Positive roots of `B2`.
const B2_ROOTS: &[Root] = &[&[1, 0], &[0, 1], &[1, 1], &[2, 1]];

/// Positive roots of `G2`.
const G2_ROOTS: &[Root] = &[&[1, 0], &[0, 1], &[1, 1], &[2, 1], &[3, 1], &[3, 2]];

/// One of the four compiled-in root systems whose representation
/// dimensions drive currency growth.
///
/// Exactly one root system is active at a time. It is selected from the
/// rank and algebra-type milestone levels by [`RootSystem::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RootSystem {
    /// `sl(2)`: rank 1, a single positive root.
    A1,
    /// `sl(3)`: rank 2, three positive roots.
    A2,
    /// `so(5)`: rank 2, four positive roots.
    B2,
    /// The exceptional algebra `g2`: rank 2, six positive roots.
    G2,
}

impl RootSystem {
    /// Select the active root system from milestone levels.
    ///
    /// Rank level 0 always means `A1`. Otherwise the algebra-type level picks
    /// `A2` (0), `B2` (1) or `G2` (2). Levels above 2 are clamped to `G2`.
    pub const fn select(rank_level: u64, alg_type_level: u64) -> Self {
        if rank_level == 0 {
            return Self::A1;
        }
        match alg_type_level {
            0 => Self::A2,
            1 => Self::B2,
            _ => Self::G2,
        }
    }

    /// The positive roots of this system.
    pub const fn positive_roots(self) -> &'static [Root] {
        match self {
            Self::A1 => A1_ROOTS,
            Self::A2 => A2_ROOTS,
            Self::B2 => B2_ROOTS,
            Self::G2 => G2_ROOTS,
        }
    }

    /// Rank of the root system (length of each root vector).
    pub const fn rank(self) -> usize {
        match self {
            Self::A1 => 1,
            Self::A2 | Self::B2 | Self::G2 => 2,
        }
    }

    /// Cartan type letter as shown in the tertiary equation.
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A1 | Self::A2 => "A",
            Self::B2 => "B",
            Self::G2 => "G",
        }
    }

    /// Whether the Weyl denominator is applied.
    ///
    /// `A2` keeps the raw numerator. This matches the shipped formula and is
    /// part of the theory's balance, so it is not "corrected" here.
    pub const fn divides_by_denominator(self) -> bool {
        !matches!(self, Self::A2)
    }
}

impl core::fmt::Display for RootSystem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}_{}", self.letter(), self.rank())
    }
}

// ---------------------------------------------------------------------------
// Equations
// ---------------------------------------------------------------------------

/// The three equation slots the host renders for a theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Equation {
    /// The growth law shown at the top of the theory panel.
    Primary,
    /// Definitions of tau and the highest weight.
    Secondary,
    /// Live dimension value and active algebra type.
    Tertiary,
}

impl Equation {
    /// All equation slots, in display order.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];
}

// ---------------------------------------------------------------------------
// Upgrade catalogue
// ---------------------------------------------------------------------------

/// Regular upgrades, bought with currency and reset by publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RegularUpgrade {
    /// First highest-weight coefficient.
    C1,
    /// Second highest-weight coefficient (rank 2 only).
    C2,
}

impl RegularUpgrade {
    /// All regular upgrades, in host index order.
    pub const ALL: [Self; 2] = [Self::C1, Self::C2];

    /// Host index of this upgrade.
    pub const fn id(self) -> UpgradeId {
        match self {
            Self::C1 => UpgradeId(0),
            Self::C2 => UpgradeId(1),
        }
    }

    /// LaTeX symbol of the variable this upgrade raises.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::C1 => "c_1",
            Self::C2 => "c_2",
        }
    }
}

/// Permanent upgrades, bought once and kept across publications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PermanentUpgrade {
    /// Unlocks publishing.
    Publication,
    /// Unlocks buying the maximum affordable levels at once.
    BuyAll,
    /// Unlocks automatic purchasing each tick.
    AutoBuyer,
}

impl PermanentUpgrade {
    /// All permanent upgrades, in host index order.
    pub const ALL: [Self; 3] = [Self::Publication, Self::BuyAll, Self::AutoBuyer];

    /// Host index of this upgrade.
    pub const fn id(self) -> PermanentId {
        match self {
            Self::Publication => PermanentId(0),
            Self::BuyAll => PermanentId(1),
            Self::AutoBuyer => PermanentId(2),
        }
    }
}

/// Milestone upgrades, bought with milestone points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Milestone {
    /// Raises the Lie algebra from rank 1 to rank 2.
    Rank,
    /// Switches the rank-2 algebra from type A to B to G.
    AlgebraType,
}

impl Milestone {
    /// All milestones, in host index order.
    pub const ALL: [Self; 2] = [Self::Rank, Self::AlgebraType];

    /// Host index of this milestone.
    pub const fn id(self) -> MilestoneId {
        match self {
            Self::Rank => MilestoneId(0),
            Self::AlgebraType => MilestoneId(1),
        }
    }

    /// Maximum level this milestone can reach.
    pub const fn max_level(self) -> u64 {
        match self {
            Self::Rank => 1,
            Self::AlgebraType => 2,
        }
    }
}

/// Any upgrade whose availability flag the theory toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeTarget {
    /// A regular upgrade.
    Regular(RegularUpgrade),
    /// A milestone upgrade.
    Milestone(Milestone),
}
