//! Common utility functions for financial calculations.
//!
//! This module provides shared functionality used across the calculation
//! modules, including rounding and compounding helpers.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relo_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(123.456)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest hundred, midpoints away from zero.
///
/// Used for figures quoted to a recruiter, where $84,550 reads better as
/// $84,600 than as a cent-exact number.
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to the nearest multiple of 100.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relo_core::calculations::common::round_to_hundred;
///
/// assert_eq!(round_to_hundred(dec!(84550)), dec!(84600));
/// assert_eq!(round_to_hundred(dec!(84549.99)), dec!(84500));
/// assert_eq!(round_to_hundred(dec!(84650)), dec!(84700));
/// ```
pub fn round_to_hundred(value: Decimal) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    (value / hundred)
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        * hundred
}

/// Future value factor of a level monthly contribution: `((1 + r)^n - 1) / r`.
///
/// A monthly amount invested for `months` periods at `monthly_rate` grows to
/// `amount * compound_growth_factor(monthly_rate, months)`. A zero rate is
/// handled explicitly and yields `months` (the uninvested sum of contributions).
///
/// # Arguments
///
/// * `monthly_rate` - Periodic growth rate as a fraction (e.g. 0.07 / 12)
/// * `months` - Number of contribution periods
///
/// # Returns
///
/// The future value factor.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relo_core::calculations::common::compound_growth_factor;
///
/// assert_eq!(compound_growth_factor(dec!(0.01), 2), dec!(2.01));
/// assert_eq!(compound_growth_factor(dec!(0), 12), dec!(12));
/// ```
pub fn compound_growth_factor(monthly_rate: Decimal, months: u32) -> Decimal {
    if monthly_rate.is_zero() {
        return Decimal::from(months);
    }
    let base = Decimal::ONE + monthly_rate;
    let mut compounded = Decimal::ONE;
    for _ in 0..months {
        compounded *= base;
    }
    (compounded - Decimal::ONE) / monthly_rate
}

/// Returns the maximum of two decimal values.
///
/// # Arguments
///
/// * `a` - First decimal value
/// * `b` - Second decimal value
///
/// # Returns
///
/// The larger of the two values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use relo_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
