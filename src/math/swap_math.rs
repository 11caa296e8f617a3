//! Single-segment swap computation.
//!
//! A swap walks the curve one segment at a time. Each segment ends at the
//! next initialized tick, the caller's price limit, or the point where the
//! requested amount runs out, whichever comes first. [`compute_swap_step`]
//! resolves one such segment.

use super::full_math::{mul_div_u128, Rounding};
use super::sqrt_price_math::{
    amount0_delta, amount1_delta, next_sqrt_price_from_input, next_sqrt_price_from_output,
};
use crate::domain::PIPS_DENOMINATOR;
use crate::error::{FlashError, Result};

/// Outcome of one swap segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapStep {
    /// Sqrt price reached at the end of the segment.
    pub sqrt_price_next: u128,
    /// Input consumed, fee excluded.
    pub amount_in: u128,
    /// Output produced.
    pub amount_out: u128,
    /// Fee charged on the input.
    pub fee_amount: u128,
}

/// Computes one swap segment from `sqrt_price_current` towards
/// `sqrt_price_target`.
///
/// `amount_remaining < 0` means exact input, `> 0` exact output. The swap
/// direction is implied by the relative order of the two prices. `fee_pips`
/// is charged on the input; for exact input the part of the remainder the
/// segment cannot absorb at the fee boundary is kept as fee, so the whole
/// remainder is always accounted for when the target is not reached.
///
/// # Errors
///
/// - [`FlashError::InvalidFeeOrSpacing`] if `fee_pips` exceeds 100%, or is
///   exactly 100% for an exact-output step.
/// - Errors of the underlying amount and price computations.
pub fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: i128,
    fee_pips: u32,
) -> Result<SwapStep> {
    if fee_pips > PIPS_DENOMINATOR {
        return Err(FlashError::InvalidFeeOrSpacing("fee exceeds 100%"));
    }
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let exact_in = amount_remaining < 0;
    let fee_complement = u128::from(PIPS_DENOMINATOR - fee_pips);
    let denominator = u128::from(PIPS_DENOMINATOR);

    let in_to = |price: u128, round_up: bool| {
        if zero_for_one {
            amount0_delta(price, sqrt_price_current, liquidity, round_up)
        } else {
            amount1_delta(sqrt_price_current, price, liquidity, round_up)
        }
    };
    let out_to = |price: u128| {
        if zero_for_one {
            amount1_delta(price, sqrt_price_current, liquidity, false)
        } else {
            amount0_delta(sqrt_price_current, price, liquidity, false)
        }
    };

    if exact_in {
        let remaining = amount_remaining.unsigned_abs();
        let remaining_less_fee =
            mul_div_u128(remaining, fee_complement, denominator, Rounding::Down)?;
        let amount_in_to_target = in_to(sqrt_price_target, true)?;

        let reaches_target = remaining_less_fee >= amount_in_to_target;
        let (sqrt_price_next, amount_in, fee_amount) = if reaches_target {
            let fee_amount = if fee_pips == PIPS_DENOMINATOR {
                amount_in_to_target
            } else {
                mul_div_u128(
                    amount_in_to_target,
                    u128::from(fee_pips),
                    fee_complement,
                    Rounding::Up,
                )?
            };
            (sqrt_price_target, amount_in_to_target, fee_amount)
        } else {
            let next = next_sqrt_price_from_input(
                sqrt_price_current,
                liquidity,
                remaining_less_fee,
                zero_for_one,
            )?;
            // Whatever the segment does not absorb is kept as fee.
            (next, remaining_less_fee, remaining - remaining_less_fee)
        };
        let amount_out = out_to(sqrt_price_next)?;
        Ok(SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_amount,
        })
    } else {
        if fee_pips == PIPS_DENOMINATOR {
            return Err(FlashError::InvalidFeeOrSpacing(
                "exact output is impossible at a 100% fee",
            ));
        }
        let remaining = amount_remaining.unsigned_abs();
        let amount_out_to_target = out_to(sqrt_price_target)?;

        let (sqrt_price_next, amount_out) = if remaining >= amount_out_to_target {
            (sqrt_price_target, amount_out_to_target)
        } else {
            let next = next_sqrt_price_from_output(
                sqrt_price_current,
                liquidity,
                remaining,
                zero_for_one,
            )?;
            (next, remaining)
        };
        let amount_in = in_to(sqrt_price_next, true)?;
        let fee_amount =
            mul_div_u128(amount_in, u128::from(fee_pips), fee_complement, Rounding::Up)?;
        Ok(SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_amount,
        })
    }
}
