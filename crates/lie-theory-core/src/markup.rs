//! LaTeX markup and number formatting for host display strings.
//!
//! The host renders equation and upgrade text as inline LaTeX. These helpers
//! produce the same wrappers the host utilities do, plus the compact number
//! format used for large values (`1.23e15`).

use rust_decimal::{Decimal, RoundingStrategy};

/// Values at or above this magnitude are shown in scientific notation.
const SCIENTIFIC_THRESHOLD: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Mantissa digits after the point in scientific notation.
const MANTISSA_DECIMALS: u32 = 2;

/// Wrap `body` as inline math.
pub fn math(body: &str) -> String {
    format!("\\({body}\\)")
}

/// Inline math showing a transition from `from` to `to`.
pub fn math_to(from: &str, to: &str) -> String {
    format!("\\({from}\\rightarrow {to}\\)")
}

/// Standard info line for a milestone that raises `variable` by `amount`.
pub fn increase_info(variable: &str, amount: &str) -> String {
    format!("Increases {} by {}", math(variable), math(amount))
}

/// Format a value the way the host prints big numbers.
///
/// Below one million the value is rounded to `decimals` places with trailing
/// zeros dropped. Above it, a two-decimal mantissa and a base-10 exponent are
/// shown: `1.23e15`.
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let magnitude = value.abs();
    if magnitude < SCIENTIFIC_THRESHOLD {
        return value
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string();
    }

    let (mut mantissa, mut exponent) = split_exponent(magnitude);
    mantissa =
        mantissa.round_dp_with_strategy(MANTISSA_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    if mantissa >= Decimal::TEN {
        // Rounding can only carry 9.995 up to 10.00 here.
        #[allow(clippy::arithmetic_side_effects)]
        let shifted = mantissa / Decimal::TEN;
        mantissa = shifted;
        exponent = exponent.saturating_add(1);
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{mantissa:.2}e{exponent}")
}

/// Split a positive value into `mantissa · 10^exponent` with
/// `1 <= mantissa < 10`.
fn split_exponent(magnitude: Decimal) -> (Decimal, u32) {
    let mut mantissa = magnitude;
    let mut exponent: u32 = 0;
    while mantissa >= Decimal::TEN {
        match mantissa.checked_div(Decimal::TEN) {
            Some(next) => mantissa = next,
            None => break,
        }
        exponent = exponent.saturating_add(1);
    }
    (mantissa, exponent)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn wraps_inline_math() {
        assert_eq!(math("c_1=3"), "\\(c_1=3\\)");
        assert_eq!(math_to("c_1=3", "c_1=4"), "\\(c_1=3\\rightarrow c_1=4\\)");
    }

    #[test]
    fn increase_info_wraps_both_parts() {
        assert_eq!(increase_info("n", "1"), "Increases \\(n\\) by \\(1\\)");
    }

    #[test]
    fn small_numbers_print_plainly() {
        assert_eq!(format_number(dec!(16), 2), "16");
        assert_eq!(format_number(dec!(12.345), 2), "12.35");
        assert_eq!(format_number(dec!(7.0), 0), "7");
        assert_eq!(format_number(dec!(999999), 0), "999999");
    }

    #[test]
    fn large_numbers_use_scientific_notation() {
        assert_eq!(format_number(dec!(1000000), 0), "1.00e6");
        assert_eq!(format_number(dec!(1234567890), 0), "1.23e9");
        assert_eq!(format_number(dec!(-2500000), 0), "-2.50e6");
    }

    #[test]
    fn mantissa_rounding_carries_into_exponent() {
        assert_eq!(format_number(dec!(9999999), 0), "1.00e7");
    }
}
