//! Dimension engine, progression, and tick cycle for the Lie Theory theory.
//!
//! Currency grows at the dimension of an irreducible representation
//! `V(λ)` of a Lie algebra, computed with the Weyl dimension formula for the
//! active root system (`A1`, `A2`, `B2`, `G2`). Milestones switch the root
//! system; regular upgrades raise the highest-weight coefficients.
//!
//! # Modules
//!
//! - [`dimension`] -- Weyl dimension formula over the four root systems.
//! - [`progression`] -- [`ProgressionState`] and the milestone state machine.
//! - [`currency`] -- The rho balance and its tau high-water mark.
//! - [`cost`] -- Price curves for upgrades and milestone thresholds.
//! - [`upgrade`] -- Upgrade prices, ownership, and display text.
//! - [`milestone`] -- Milestone points earned from tau.
//! - [`publication`] -- Publication multiplier and the graph value.
//! - [`markup`] -- LaTeX helpers and number formatting.
//! - [`equations`] -- Equation rendering and the invalidation cache.
//! - [`theory`] -- The [`Theory`] host contract and [`LieTheory`].
//! - [`config`] -- Configuration loading from `lie-theory-config.yaml`.
//! - [`clock`] -- Tick clock for headless runs.
//! - [`strategy`] -- [`PurchaseStrategy`] trait, greedy and idle players.
//! - [`runner`] -- The async headless simulation loop.
//!
//! [`ProgressionState`]: progression::ProgressionState
//! [`Theory`]: theory::Theory
//! [`LieTheory`]: theory::LieTheory
//! [`PurchaseStrategy`]: strategy::PurchaseStrategy

pub mod clock;
pub mod config;
pub mod cost;
pub mod currency;
pub mod dimension;
pub mod equations;
pub mod markup;
pub mod milestone;
pub mod progression;
pub mod publication;
pub mod runner;
pub mod strategy;
pub mod theory;
pub mod upgrade;
