//! Representation dimensions via the Weyl dimension formula.
//!
//! For a root system with positive roots `R` and a highest weight `λ` given
//! by its coefficients in the fundamental weights, the theory uses
//!
//! ```text
//! (ρ+λ)_i   = 1 + level_i
//! numFact(α) = Σ_i (ρ+λ)_i · α_i
//! denomFact(α) = Σ_i α_i
//! dim V(λ)  = Π numFact(α) / Π denomFact(α)
//! ```
//!
//! which is the Weyl formula with all simple roots treated as the same
//! length. `A2` returns the numerator alone (see
//! [`RootSystem::divides_by_denominator`]).
//!
//! Products are formed in checked `u128` and the quotient in [`Decimal`].
//! Nothing here panics; an unrepresentable product is reported as
//! [`DimensionError::Overflow`].

use lie_theory_types::{Root, RootSystem};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Errors that can occur while evaluating a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// A product exceeded `u128` or the result exceeded the [`Decimal`] range.
    #[error("dimension of {system} overflows for the given weight")]
    Overflow {
        /// The root system being evaluated.
        system: RootSystem,
    },
}

/// Numerator and denominator of the Weyl product for one highest weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeylFactors {
    /// `Π numFact(α)` over the positive roots.
    pub numerator: u128,
    /// `Π denomFact(α)` over the positive roots. Always at least 1.
    pub denominator: u128,
}

/// Compute the Weyl numerator and denominator for `system` at `levels`.
///
/// `levels` holds the highest-weight coefficients `(c1, c2, ..)`. Only the
/// first `system.rank()` entries are read; missing entries count as 0.
///
/// # Errors
///
/// Returns [`DimensionError::Overflow`] if a product leaves the `u128` range.
pub fn weyl_factors(system: RootSystem, levels: &[u64]) -> Result<WeylFactors, DimensionError> {
    let overflow = DimensionError::Overflow { system };
    let mut numerator: u128 = 1;
    let mut denominator: u128 = 1;

    for root in system.positive_roots() {
        let (num_fact, denom_fact) = root_factors(root, levels).ok_or(overflow)?;
        numerator = numerator.checked_mul(num_fact).ok_or(overflow)?;
        denominator = denominator.checked_mul(denom_fact).ok_or(overflow)?;
    }

    Ok(WeylFactors {
        numerator,
        denominator,
    })
}

/// `(numFact(α), denomFact(α))` for a single root.
fn root_factors(root: Root, levels: &[u64]) -> Option<(u128, u128)> {
    let mut num_fact: u128 = 0;
    let mut denom_fact: u128 = 0;
    for (i, coefficient) in root.iter().enumerate() {
        let level = u128::from(levels.get(i).copied().unwrap_or(0));
        let rho_lambda = level.checked_add(1)?;
        let alpha = u128::from(*coefficient);
        num_fact = num_fact.checked_add(rho_lambda.checked_mul(alpha)?)?;
        denom_fact = denom_fact.checked_add(alpha)?;
    }
    Some((num_fact, denom_fact))
}

/// Dimension of the irreducible representation of `system` with highest
/// weight `c1·ω1 + c2·ω2`.
///
/// `c2_level` is ignored for rank-1 systems.
///
/// # Errors
///
/// Returns [`DimensionError::Overflow`] if the result is not representable.
pub fn system_dimension(
    system: RootSystem,
    c1_level: u64,
    c2_level: u64,
) -> Result<Decimal, DimensionError> {
    let overflow = DimensionError::Overflow { system };
    let factors = weyl_factors(system, &[c1_level, c2_level])?;
    let numerator = Decimal::from_u128(factors.numerator).ok_or(overflow)?;

    if !system.divides_by_denominator() {
        return Ok(numerator);
    }

    // denomFact >= 1 for every positive root, so the denominator is never zero.
    let denominator = Decimal::from_u128(factors.denominator).ok_or(overflow)?;
    numerator.checked_div(denominator).ok_or(overflow)
}

/// Dimension for raw progression levels.
///
/// Selects the root system from `rank_level` and `alg_type_level` (see
/// [`RootSystem::select`]) and evaluates it. Pure: identical inputs always
/// give identical outputs.
///
/// # Errors
///
/// Returns [`DimensionError::Overflow`] if the result is not representable.
pub fn dimension(
    c1_level: u64,
    c2_level: u64,
    rank_level: u64,
    alg_type_level: u64,
) -> Result<Decimal, DimensionError> {
    system_dimension(
        RootSystem::select(rank_level, alg_type_level),
        c1_level,
        c2_level,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn a1_is_c1_plus_one() {
        for c1 in [0_u64, 1, 5, 99, 12_345] {
            let expected = Decimal::from(c1 + 1);
            assert_eq!(dimension(c1, 0, 0, 0).unwrap(), expected);
        }
    }

    #[test]
    fn a1_ignores_c2_and_alg_type() {
        assert_eq!(dimension(5, 40, 0, 2).unwrap(), dec!(6));
        assert_eq!(dimension(0, 7, 0, 1).unwrap(), dec!(1));
    }

    #[test]
    fn a2_keeps_numerator_only() {
        assert_eq!(dimension(0, 0, 1, 0).unwrap(), dec!(2));
        assert_eq!(dimension(1, 1, 1, 0).unwrap(), dec!(16));
        for (c1, c2) in [(2_u64, 0_u64), (3, 4), (10, 1)] {
            let expected = (c1 + 1) * (c2 + 1) * (c1 + c2 + 2);
            assert_eq!(dimension(c1, c2, 1, 0).unwrap(), Decimal::from(expected));
        }
    }

    #[test]
    fn a2_denominator_is_still_computed() {
        let factors = weyl_factors(RootSystem::A2, &[1, 1]).unwrap();
        assert_eq!(factors.numerator, 16);
        assert_eq!(factors.denominator, 2);
    }

    #[test]
    fn b2_matches_closed_form() {
        assert_eq!(dimension(0, 0, 1, 1).unwrap(), dec!(1));
        assert_eq!(dimension(1, 0, 1, 1).unwrap(), dec!(5));
        assert_eq!(dimension(0, 1, 1, 1).unwrap(), dec!(4));
        assert_eq!(dimension(1, 1, 1, 1).unwrap(), dec!(16));
        for (c1, c2) in [(2_u64, 3_u64), (7, 0), (4, 9)] {
            let closed = (c1 + 1) * (c2 + 1) * (c1 + c2 + 2) * (2 * c1 + c2 + 3) / 6;
            assert_eq!(dimension(c1, c2, 1, 1).unwrap(), Decimal::from(closed));
        }
    }

    #[test]
    fn g2_reference_values() {
        assert_eq!(dimension(0, 0, 1, 2).unwrap(), dec!(1));
        assert_eq!(dimension(1, 0, 1, 2).unwrap(), dec!(14));
        assert_eq!(dimension(0, 1, 1, 2).unwrap(), dec!(7));
        assert_eq!(dimension(1, 1, 1, 2).unwrap(), dec!(64));
    }

    #[test]
    fn g2_denominator_is_120() {
        let factors = weyl_factors(RootSystem::G2, &[0, 0]).unwrap();
        assert_eq!(factors.numerator, 120);
        assert_eq!(factors.denominator, 120);
    }

    #[test]
    fn missing_levels_count_as_zero() {
        let factors = weyl_factors(RootSystem::B2, &[]).unwrap();
        assert_eq!(factors.numerator, 6);
        assert_eq!(factors.denominator, 6);
    }

    #[test]
    fn dimension_is_pure() {
        let first = dimension(13, 8, 1, 2).unwrap();
        let second = dimension(13, 8, 1, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn huge_levels_overflow_instead_of_panicking() {
        let result = dimension(u64::MAX, u64::MAX, 1, 2);
        assert_eq!(
            result,
            Err(DimensionError::Overflow {
                system: RootSystem::G2
            })
        );
    }
}
