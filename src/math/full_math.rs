//! 256-bit intermediate arithmetic with explicit rounding.
//!
//! Every division in the curve engine names its rounding direction. The
//! convention is to round against the trader and in favour of the pool:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Amount the caller pays in | [`Rounding::Up`] |
//! | Amount the caller receives | [`Rounding::Down`] |
//! | Fee charged | [`Rounding::Up`] |
//! | Fees owed to a position | [`Rounding::Down`] |
//!
//! Products are formed in [`U256`]. A product that does not fit 256 bits is
//! reported as [`FlashError::Overflow`], never truncated.
//!
//! # Examples
//!
//! ```
//! use hydra_flash::math::{mul_div_u128, Rounding};
//!
//! assert_eq!(mul_div_u128(10, 1, 3, Rounding::Down), Ok(3));
//! assert_eq!(mul_div_u128(10, 1, 3, Rounding::Up), Ok(4));
//! assert!(mul_div_u128(1, 1, 0, Rounding::Down).is_err());
//! ```

use ethnum::U256;

use crate::error::{FlashError, Result};

/// Rounding direction for a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Towards positive infinity.
    Up,
    /// Towards zero.
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// `Up` when `round_up` is `true`, else `Down`.
    #[must_use]
    pub const fn up_if(round_up: bool) -> Self {
        if round_up {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// `numerator / denominator` rounded in the given direction.
///
/// # Errors
///
/// Returns [`FlashError::DivisionByZero`] if `denominator` is zero.
pub fn div_round(numerator: U256, denominator: U256, rounding: Rounding) -> Result<U256> {
    if denominator == U256::ZERO {
        return Err(FlashError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    if rounding.is_up() && numerator % denominator != U256::ZERO {
        // quotient < numerator here, so the increment cannot wrap.
        return Ok(quotient + U256::ONE);
    }
    Ok(quotient)
}

/// `a * b / denominator` with a 256-bit intermediate product.
///
/// # Errors
///
/// - [`FlashError::DivisionByZero`] if `denominator` is zero.
/// - [`FlashError::Overflow`] if `a * b` exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Result<U256> {
    let product = a
        .checked_mul(b)
        .ok_or(FlashError::Overflow("mul_div product exceeds 256 bits"))?;
    div_round(product, denominator, rounding)
}

/// [`mul_div`] on `u128` operands with a checked narrowing of the result.
///
/// # Errors
///
/// - [`FlashError::DivisionByZero`] if `denominator` is zero.
/// - [`FlashError::Overflow`] if the quotient does not fit `u128`.
pub fn mul_div_u128(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    let wide = mul_div(
        U256::from(a),
        U256::from(b),
        U256::from(denominator),
        rounding,
    )?;
    narrow(wide, "mul_div result exceeds u128")
}

/// Narrows a 256-bit value to `u128`.
///
/// # Errors
///
/// Returns [`FlashError::Overflow`] with `context` if `value` exceeds
/// `u128::MAX`.
pub fn narrow(value: U256, context: &'static str) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(FlashError::Overflow(context));
    }
    Ok(value.as_u128())
}

/// Converts an unsigned amount to `i128`.
///
/// # Errors
///
/// Returns [`FlashError::Overflow`] with `context` above `i128::MAX`.
pub fn to_i128(value: u128, context: &'static str) -> Result<i128> {
    i128::try_from(value).map_err(|_| FlashError::Overflow(context))
}
