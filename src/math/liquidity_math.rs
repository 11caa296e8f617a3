//! Signed liquidity adjustments.

use crate::error::{FlashError, Result};

/// Applies a signed `delta` to an unsigned liquidity amount.
///
/// # Errors
///
/// - [`FlashError::Underflow`] when removing more than `liquidity` holds.
/// - [`FlashError::Overflow`] when the sum exceeds `u128::MAX`.
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(FlashError::Underflow("liquidity below zero"))
    } else {
        liquidity
            .checked_add(delta.unsigned_abs())
            .ok_or(FlashError::Overflow("liquidity exceeds u128"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_both_signs() {
        assert_eq!(add_delta(10, 5), Ok(15));
        assert_eq!(add_delta(10, -10), Ok(0));
        assert_eq!(add_delta(10, 0), Ok(10));
    }

    #[test]
    fn reports_out_of_range() {
        assert!(matches!(add_delta(1, -2), Err(FlashError::Underflow(_))));
        assert!(matches!(add_delta(u128::MAX, 1), Err(FlashError::Overflow(_))));
        assert_eq!(add_delta(0, i128::MIN), Err(FlashError::Underflow("liquidity below zero")));
    }
}
