//! Core data structs exchanged with the host.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PermanentUpgrade, RootSystem, UpgradeTarget};
use crate::ids::{PermanentId, RunId};

/// Persistable state of a theory instance.
///
/// The theory never writes this anywhere itself; the host (or the headless
/// engine) decides where snapshots go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TheorySnapshot {
    /// Run the snapshot was taken from.
    pub run_id: RunId,
    /// Wall-clock time of the snapshot.
    pub saved_at: DateTime<Utc>,
    /// Ticks executed so far.
    pub ticks: u64,
    /// Level of the `c1` upgrade.
    pub c1_level: u64,
    /// Level of the `c2` upgrade.
    pub c2_level: u64,
    /// Level of the rank milestone.
    pub rank_level: u64,
    /// Level of the algebra-type milestone.
    pub alg_type_level: u64,
    /// Current currency value (rho).
    #[ts(as = "String")]
    pub currency: Decimal,
    /// Highest currency value ever reached (tau high-water mark).
    #[ts(as = "String")]
    pub max_tau: Decimal,
    /// Multiplier granted by the last publication.
    #[ts(as = "String")]
    pub publication_bonus: Decimal,
    /// Permanent upgrades that have been bought.
    pub permanents: BTreeSet<PermanentUpgrade>,
    /// Whether the autobuyer is switched on (only meaningful once bought).
    pub autobuyer_enabled: bool,
}

/// Display state of one upgrade, as the host's upgrade panel shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeView {
    /// Which upgrade this is.
    pub target: UpgradeTarget,
    /// Host index within the upgrade's category.
    pub index: u32,
    /// Current level.
    pub level: u64,
    /// Level cap, if any.
    pub max_level: Option<u64>,
    /// Whether the host should let the player interact with it.
    pub available: bool,
    /// Short description markup.
    pub description: String,
    /// Longer info markup (before/after values for regular upgrades).
    pub info: String,
    /// Currency cost of the next level, if currency-priced and representable.
    #[ts(as = "Option<String>")]
    pub cost: Option<Decimal>,
}

/// Display state of one permanent upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PermanentView {
    /// Host index of the upgrade.
    pub id: PermanentId,
    /// Which permanent upgrade this is.
    pub upgrade: PermanentUpgrade,
    /// Whether it has been bought.
    pub owned: bool,
    /// Short description markup.
    pub description: String,
    /// Currency price.
    #[ts(as = "String")]
    pub cost: Decimal,
}

/// Snapshot of the numbers that feed one tick's accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GrowthReport {
    /// Root system that produced the dimension.
    pub root_system: RootSystem,
    /// Representation dimension used as the per-second rate.
    #[ts(as = "String")]
    pub dimension: Decimal,
    /// Currency added during the tick.
    #[ts(as = "String")]
    pub gained: Decimal,
    /// Currency after the tick.
    #[ts(as = "String")]
    pub currency: Decimal,
}
