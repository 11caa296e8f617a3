//! Token amounts between sqrt prices, and price movement from amounts.
//!
//! Within one tick range the pool behaves as a constant-product curve
//! parameterised by `L` and `sqrt(P)`:
//!
//! - `amount0 = L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)`
//! - `amount1 = L * (sqrt_b - sqrt_a)`
//!
//! All prices are raw Q64.64 values. Amounts paid in round up, amounts paid
//! out round down, and every price moved by an amount rounds in the
//! direction that keeps the pool solvent.

use ethnum::U256;

use super::full_math::{div_round, mul_div, narrow, to_i128, Rounding};
use crate::error::{FlashError, Result};

/// Amount of `currency0` between two sqrt prices for `liquidity`.
///
/// # Errors
///
/// - [`FlashError::InvalidPrice`] if the lower price is zero.
/// - [`FlashError::Overflow`] if the amount does not fit `u128`.
pub fn amount0_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    if lower == 0 {
        return Err(FlashError::InvalidPrice("sqrt price must be positive"));
    }
    let numerator1 = U256::from(liquidity) << 64;
    let numerator2 = U256::from(upper - lower);
    let rounding = Rounding::up_if(round_up);

    let scaled = mul_div(numerator1, numerator2, U256::from(upper), rounding)?;
    let amount = div_round(scaled, U256::from(lower), rounding)?;
    narrow(amount, "amount0 exceeds u128")
}

/// Amount of `currency1` between two sqrt prices for `liquidity`.
///
/// # Errors
///
/// Returns [`FlashError::Overflow`] if the amount does not fit `u128`.
pub fn amount1_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    let amount = mul_div(
        U256::from(liquidity),
        U256::from(upper - lower),
        U256::ONE << 64,
        Rounding::up_if(round_up),
    )?;
    narrow(amount, "amount1 exceeds u128")
}

/// Signed [`amount0_delta`]: positive liquidity rounds up (owed to the pool),
/// negative liquidity rounds down and is returned negated.
///
/// # Errors
///
/// Propagates [`amount0_delta`] errors and reports amounts above `i128::MAX`
/// as [`FlashError::Overflow`].
pub fn amount0_delta_signed(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: i128,
) -> Result<i128> {
    if liquidity < 0 {
        let amount = amount0_delta(sqrt_price_a, sqrt_price_b, liquidity.unsigned_abs(), false)?;
        Ok(-to_i128(amount, "amount0 exceeds i128")?)
    } else {
        let amount = amount0_delta(sqrt_price_a, sqrt_price_b, liquidity.unsigned_abs(), true)?;
        to_i128(amount, "amount0 exceeds i128")
    }
}

/// Signed [`amount1_delta`], with the same rounding rule as
/// [`amount0_delta_signed`].
///
/// # Errors
///
/// Propagates [`amount1_delta`] errors and reports amounts above `i128::MAX`
/// as [`FlashError::Overflow`].
pub fn amount1_delta_signed(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: i128,
) -> Result<i128> {
    if liquidity < 0 {
        let amount = amount1_delta(sqrt_price_a, sqrt_price_b, liquidity.unsigned_abs(), false)?;
        Ok(-to_i128(amount, "amount1 exceeds i128")?)
    } else {
        let amount = amount1_delta(sqrt_price_a, sqrt_price_b, liquidity.unsigned_abs(), true)?;
        to_i128(amount, "amount1 exceeds i128")
    }
}

/// Price after adding `amount_in` of the input currency.
///
/// # Errors
///
/// - [`FlashError::InsufficientLiquidity`] if `liquidity` is zero.
/// - [`FlashError::InvalidPrice`] if `sqrt_price` is zero.
/// - [`FlashError::Overflow`] if the price leaves the `u128` range.
pub fn next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> Result<u128> {
    check_inputs(sqrt_price, liquidity)?;
    if zero_for_one {
        next_from_amount0_rounding_up(sqrt_price, liquidity, amount_in, true)
    } else {
        next_from_amount1_rounding_down(sqrt_price, liquidity, amount_in, true)
    }
}

/// Price after removing `amount_out` of the output currency.
///
/// # Errors
///
/// - [`FlashError::InsufficientLiquidity`] if `liquidity` is zero or cannot
///   supply `amount_out`.
/// - [`FlashError::InvalidPrice`] if `sqrt_price` is zero.
/// - [`FlashError::Overflow`] if the price leaves the `u128` range.
pub fn next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u128,
    zero_for_one: bool,
) -> Result<u128> {
    check_inputs(sqrt_price, liquidity)?;
    if zero_for_one {
        next_from_amount1_rounding_down(sqrt_price, liquidity, amount_out, false)
    } else {
        next_from_amount0_rounding_up(sqrt_price, liquidity, amount_out, false)
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

const fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn check_inputs(sqrt_price: u128, liquidity: u128) -> Result<()> {
    if sqrt_price == 0 {
        return Err(FlashError::InvalidPrice("sqrt price must be positive"));
    }
    if liquidity == 0 {
        return Err(FlashError::InsufficientLiquidity);
    }
    Ok(())
}

/// `L * sqrt / (L +- amount * sqrt)`, rounded up so the price never moves
/// further than the amount pays for.
fn next_from_amount0_rounding_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    let numerator1: U256 = U256::from(liquidity) << 64;
    let sqrt = U256::from(sqrt_price);
    // Both factors are below 2^128, so the product fits.
    let product = U256::from(amount) * sqrt;

    let next = if add {
        let denominator = numerator1
            .checked_add(product)
            .ok_or(FlashError::Overflow("sqrt price denominator exceeds 256 bits"))?;
        match numerator1.checked_mul(sqrt) {
            Some(numerator) => div_round(numerator, denominator, Rounding::Up)?,
            // Equivalent form without the wide product.
            None => {
                let denominator = numerator1 / sqrt + U256::from(amount);
                div_round(numerator1, denominator, Rounding::Up)?
            }
        }
    } else {
        if numerator1 <= product {
            return Err(FlashError::InsufficientLiquidity);
        }
        mul_div(numerator1, sqrt, numerator1 - product, Rounding::Up)?
    };
    narrow(next, "sqrt price exceeds u128")
}

/// `sqrt +- amount / L`, rounded down so the price never moves further than
/// the amount pays for.
fn next_from_amount1_rounding_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    let shifted = U256::from(amount) << 64;
    let liquidity = U256::from(liquidity);
    if add {
        let quotient = div_round(shifted, liquidity, Rounding::Down)?;
        let next = U256::from(sqrt_price)
            .checked_add(quotient)
            .ok_or(FlashError::Overflow("sqrt price exceeds 256 bits"))?;
        narrow(next, "sqrt price exceeds u128")
    } else {
        let quotient = div_round(shifted, liquidity, Rounding::Up)?;
        let sqrt = U256::from(sqrt_price);
        if sqrt <= quotient {
            return Err(FlashError::InsufficientLiquidity);
        }
        narrow(sqrt - quotient, "sqrt price exceeds u128")
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Q64;

    const L: u128 = 1_000_000_000_000_000_000;
    const SQRT_P60: u128 = 18_502_164_624_211_761_448;
    const SQRT_M60: u128 = 18_391_489_527_427_947_883;

    // -- amounts ------------------------------------------------------------

    #[test]
    fn amount0_rounding() {
        assert_eq!(amount0_delta(Q64, SQRT_P60, L, true), Ok(2_995_354_955_910_781));
        assert_eq!(amount0_delta(Q64, SQRT_P60, L, false), Ok(2_995_354_955_910_780));
    }

    #[test]
    fn amount1_rounding() {
        assert_eq!(amount1_delta(SQRT_M60, Q64, L, true), Ok(2_995_354_955_910_781));
        assert_eq!(amount1_delta(SQRT_M60, Q64, L, false), Ok(2_995_354_955_910_780));
    }

    #[test]
    fn argument_order_is_irrelevant() {
        assert_eq!(
            amount0_delta(SQRT_P60, Q64, L, true),
            amount0_delta(Q64, SQRT_P60, L, true)
        );
        assert_eq!(
            amount1_delta(Q64, SQRT_M60, L, false),
            amount1_delta(SQRT_M60, Q64, L, false)
        );
    }

    #[test]
    fn equal_prices_give_zero() {
        assert_eq!(amount0_delta(Q64, Q64, L, true), Ok(0));
        assert_eq!(amount1_delta(Q64, Q64, L, true), Ok(0));
    }

    #[test]
    fn zero_price_rejected() {
        assert!(matches!(
            amount0_delta(0, Q64, L, true),
            Err(FlashError::InvalidPrice(_))
        ));
    }

    #[test]
    fn signed_amounts_round_against_the_caller() {
        let Ok(add) = amount0_delta_signed(Q64, SQRT_P60, 1_000_000) else {
            panic!("expected Ok");
        };
        let Ok(remove) = amount0_delta_signed(Q64, SQRT_P60, -1_000_000) else {
            panic!("expected Ok");
        };
        assert!(add > 0);
        assert!(remove < 0);
        assert!(add >= -remove);
        assert!(add + remove <= 1);

        let Ok(add1) = amount1_delta_signed(SQRT_M60, Q64, 1_000_000) else {
            panic!("expected Ok");
        };
        let Ok(remove1) = amount1_delta_signed(SQRT_M60, Q64, -1_000_000) else {
            panic!("expected Ok");
        };
        assert!(add1 >= -remove1);
    }

    // -- next price ---------------------------------------------------------

    #[test]
    fn input_moves_price_in_swap_direction() {
        assert_eq!(
            next_sqrt_price_from_input(Q64, L, 1_000_000, true),
            Ok(18_446_744_073_691_104_872)
        );
        assert_eq!(
            next_sqrt_price_from_input(Q64, L, 1_000_000, false),
            Ok(18_446_744_073_727_998_360)
        );
    }

    #[test]
    fn output_moves_price_in_swap_direction() {
        assert_eq!(
            next_sqrt_price_from_output(Q64, L, 1_000_000, true),
            Ok(18_446_744_073_691_104_871)
        );
        assert_eq!(
            next_sqrt_price_from_output(Q64, L, 1_000_000, false),
            Ok(18_446_744_073_727_998_361)
        );
    }

    #[test]
    fn zero_amount_keeps_price() {
        assert_eq!(next_sqrt_price_from_input(Q64, L, 0, true), Ok(Q64));
        assert_eq!(next_sqrt_price_from_input(Q64, L, 0, false), Ok(Q64));
    }

    #[test]
    fn zero_liquidity_rejected() {
        assert_eq!(
            next_sqrt_price_from_input(Q64, 0, 1, true),
            Err(FlashError::InsufficientLiquidity)
        );
    }

    #[test]
    fn output_beyond_reserves_rejected() {
        // Removing all of currency1 would drive the price to zero.
        assert_eq!(
            next_sqrt_price_from_output(Q64, 1, 1, true),
            Err(FlashError::InsufficientLiquidity)
        );
        // Removing more currency0 than the curve holds.
        assert_eq!(
            next_sqrt_price_from_output(Q64, 1, 1, false),
            Err(FlashError::InsufficientLiquidity)
        );
    }
}
