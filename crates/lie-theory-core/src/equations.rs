//! Equation text shown in the theory panel, and its invalidation cache.
//!
//! Rendering is pure: each renderer reads the [`ProgressionState`] and returns
//! a LaTeX string. [`EquationCache`] memoises the last rendering per slot
//! until something invalidates it, so the host can poll the getters every
//! frame without re-rendering unchanged text.

use std::collections::BTreeMap;

use lie_theory_types::Equation;

use crate::dimension::DimensionError;
use crate::markup;
use crate::progression::ProgressionState;

/// LaTeX symbol of the theory's tau value.
pub const THEORY_SYMBOL: &str = "\\tau";

/// Decimals shown for the live dimension value.
const DIMENSION_DECIMALS: u32 = 2;

/// The growth law.
pub fn render_primary() -> String {
    "\\dot{\\rho} = \\text{dim} V(\\lambda)".to_owned()
}

/// Definitions of tau and of the highest weight `λ`.
///
/// The `c_2 ω_2` term only appears once rank 2 is unlocked.
pub fn render_secondary(symbol: &str, state: &ProgressionState) -> String {
    let mut result = String::from("\\begin{matrix}");
    result.push_str(symbol);
    result.push_str("=\\max\\rho,");
    result.push_str("&\\lambda =");
    result.push_str("c_1 \\omega_1");
    if state.rank_two_unlocked() {
        result.push_str("+c_2\\omega_2");
    }
    result.push_str("\\end{matrix}");
    result
}

/// Live dimension and the active algebra type.
///
/// The label follows [`ProgressionState::root_system`], so a rank-1 state
/// always reads `A_1` even while an algebra-type level is held.
///
/// # Errors
///
/// Returns [`DimensionError`] if the dimension is not representable.
pub fn render_tertiary(state: &ProgressionState) -> Result<String, DimensionError> {
    let dimension = state.dimension()?;
    Ok(format!(
        "\\begin{{matrix}}\\text{{dim}} V(\\lambda) = {}, & \\text{{Type }}{} \\end{{matrix}}",
        markup::format_number(dimension, DIMENSION_DECIMALS),
        state.root_system(),
    ))
}

/// Memoised equation text, one entry per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquationCache {
    /// Rendered text for every slot that is still valid.
    entries: BTreeMap<Equation, String>,
}

impl EquationCache {
    /// An empty cache; every slot renders on first access.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Mark one slot stale.
    pub fn invalidate(&mut self, equation: Equation) {
        self.entries.remove(&equation);
    }

    /// Mark every slot stale.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Return the cached text for `equation`, rendering it first if stale.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error; nothing is cached in that case.
    pub fn get_or_render<E>(
        &mut self,
        equation: Equation,
        render: impl FnOnce() -> Result<String, E>,
    ) -> Result<String, E> {
        if let Some(text) = self.entries.get(&equation) {
            return Ok(text.clone());
        }
        let text = render()?;
        self.entries.insert(equation, text.clone());
        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use lie_theory_types::{Milestone, RegularUpgrade};

    use super::*;
    use crate::progression::MilestoneTransition;

    fn rank_two(c1: u64, c2: u64, alg: u64) -> ProgressionState {
        ProgressionState::from_levels(c1, c2, 1, alg)
    }

    #[test]
    fn primary_is_the_growth_law() {
        assert_eq!(render_primary(), "\\dot{\\rho} = \\text{dim} V(\\lambda)");
    }

    #[test]
    fn secondary_shows_c2_only_at_rank_two() {
        let rank_one = ProgressionState::new();
        assert_eq!(
            render_secondary(THEORY_SYMBOL, &rank_one),
            "\\begin{matrix}\\tau=\\max\\rho,&\\lambda =c_1 \\omega_1\\end{matrix}"
        );
        assert_eq!(
            render_secondary(THEORY_SYMBOL, &rank_two(0, 0, 0)),
            "\\begin{matrix}\\tau=\\max\\rho,&\\lambda =c_1 \\omega_1+c_2\\omega_2\\end{matrix}"
        );
    }

    #[test]
    fn tertiary_shows_dimension_and_type() {
        let state = ProgressionState::new()
            .with_regular_raised(RegularUpgrade::C1, 5)
            .unwrap();
        assert_eq!(
            render_tertiary(&state).unwrap(),
            "\\begin{matrix}\\text{dim} V(\\lambda) = 6, & \\text{Type }A_1 \\end{matrix}"
        );
        assert_eq!(
            render_tertiary(&rank_two(1, 1, 0)).unwrap(),
            "\\begin{matrix}\\text{dim} V(\\lambda) = 16, & \\text{Type }A_2 \\end{matrix}"
        );
        assert!(render_tertiary(&rank_two(1, 1, 2)).unwrap().contains("= 64, & \\text{Type }G_2"));
    }

    #[test]
    fn tertiary_label_ignores_alg_type_at_rank_one() {
        let refunded = ProgressionState::from_levels(0, 0, 0, 2);
        assert_eq!(
            render_tertiary(&refunded).unwrap(),
            "\\begin{matrix}\\text{dim} V(\\lambda) = 1, & \\text{Type }A_1 \\end{matrix}"
        );
    }

    #[test]
    fn cache_serves_until_invalidated() {
        let mut cache = EquationCache::new();
        let mut renders = 0;
        for _ in 0..3 {
            let text = cache
                .get_or_render(Equation::Primary, || -> Result<String, DimensionError> {
                    renders += 1;
                    Ok(render_primary())
                })
                .unwrap();
            assert_eq!(text, render_primary());
        }
        assert_eq!(renders, 1);

        cache.invalidate(Equation::Primary);
        cache
            .get_or_render(Equation::Primary, || -> Result<String, DimensionError> {
                renders += 1;
                Ok(render_primary())
            })
            .unwrap();
        assert_eq!(renders, 2);
    }

    #[test]
    fn rank_change_is_visible_after_invalidation() {
        let mut cache = EquationCache::new();
        let before = ProgressionState::new();
        let text = cache
            .get_or_render(Equation::Secondary, || -> Result<String, DimensionError> {
                Ok(render_secondary(THEORY_SYMBOL, &before))
            })
            .unwrap();
        assert!(!text.contains("c_2"));

        let after = before
            .apply(MilestoneTransition::Buy(Milestone::Rank))
            .unwrap();
        for effect in &after.effects {
            if let crate::progression::Effect::InvalidateEquation(eq) = effect {
                cache.invalidate(*eq);
            }
        }
        let text = cache
            .get_or_render(Equation::Secondary, || -> Result<String, DimensionError> {
                Ok(render_secondary(THEORY_SYMBOL, &after.state))
            })
            .unwrap();
        assert!(text.contains("+c_2\\omega_2"));
    }
}
