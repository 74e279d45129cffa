//! Shared type definitions for the Lie Theory theory.
//!
//! This crate is the single source of truth for the types that cross the
//! boundary between the theory and its host. Types defined here flow to
//! `TypeScript` via `ts-rs` for the host's theory panel.
//!
//! # Modules
//!
//! - [`ids`] -- Index newtypes for host upgrades and the run identifier
//! - [`enums`] -- Root systems, equation slots, and the upgrade catalogue
//! - [`structs`] -- Snapshots and display views handed to the host

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Equation, Milestone, PermanentUpgrade, RegularUpgrade, Root, RootSystem, UpgradeTarget,
};
pub use ids::{MilestoneId, PermanentId, RunId, UpgradeId};
pub use structs::{GrowthReport, PermanentView, TheorySnapshot, UpgradeView};
