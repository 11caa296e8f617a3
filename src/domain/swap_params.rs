//! Swap request parameters.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::SqrtPrice;
use crate::error::FlashError;

/// Which side of a swap the caller fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapType {
    /// The input amount is fixed; output is computed.
    ExactIn,
    /// The output amount is fixed; input is computed.
    ExactOut,
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn => write!(f, "ExactIn"),
            Self::ExactOut => write!(f, "ExactOut"),
        }
    }
}

/// A swap request against one pool.
///
/// `amount_specified` uses the signed convention: negative is an exact-input
/// amount of the input currency, positive is an exact-output amount of the
/// output currency. A swap stops early when the price reaches
/// `sqrt_price_limit`; the partial fill is reported in the returned delta.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::{SqrtPrice, SwapParams, SwapType};
///
/// let params = SwapParams::exact_in(true, 1_000, SqrtPrice::MIN_LIMIT).expect("fits i128");
/// assert_eq!(params.amount_specified(), -1_000);
/// assert_eq!(params.swap_type(), SwapType::ExactIn);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapParams {
    zero_for_one: bool,
    amount_specified: i128,
    sqrt_price_limit: SqrtPrice,
}

impl SwapParams {
    /// Creates parameters from the raw signed amount.
    ///
    /// A zero amount is accepted here and rejected by the manager with
    /// [`FlashError::InvalidSwapAmount`].
    #[must_use]
    pub const fn new(
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit: SqrtPrice,
    ) -> Self {
        Self {
            zero_for_one,
            amount_specified,
            sqrt_price_limit,
        }
    }

    /// Sells exactly `amount_in` of the input currency.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Overflow`] if `amount_in` exceeds `i128::MAX`.
    pub fn exact_in(
        zero_for_one: bool,
        amount_in: u128,
        sqrt_price_limit: SqrtPrice,
    ) -> crate::error::Result<Self> {
        let amount = i128::try_from(amount_in)
            .map_err(|_| FlashError::Overflow("swap amount exceeds i128"))?;
        Ok(Self::new(zero_for_one, -amount, sqrt_price_limit))
    }

    /// Buys exactly `amount_out` of the output currency.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Overflow`] if `amount_out` exceeds `i128::MAX`.
    pub fn exact_out(
        zero_for_one: bool,
        amount_out: u128,
        sqrt_price_limit: SqrtPrice,
    ) -> crate::error::Result<Self> {
        let amount = i128::try_from(amount_out)
            .map_err(|_| FlashError::Overflow("swap amount exceeds i128"))?;
        Ok(Self::new(zero_for_one, amount, sqrt_price_limit))
    }

    /// `true` sells `currency0` for `currency1`, moving the price down.
    #[must_use]
    pub const fn zero_for_one(&self) -> bool {
        self.zero_for_one
    }

    /// Signed requested amount.
    #[must_use]
    pub const fn amount_specified(&self) -> i128 {
        self.amount_specified
    }

    /// Price bound the swap may not cross.
    #[must_use]
    pub const fn sqrt_price_limit(&self) -> SqrtPrice {
        self.sqrt_price_limit
    }

    /// Whether the input or the output side is fixed.
    #[must_use]
    pub const fn swap_type(&self) -> SwapType {
        if self.amount_specified < 0 {
            SwapType::ExactIn
        } else {
            SwapType::ExactOut
        }
    }

    /// `true` when the specified amount is in `currency0`.
    #[must_use]
    pub const fn specified_is_currency0(&self) -> bool {
        // Exact-in fixes the input side, exact-out the output side.
        self.zero_for_one == (self.amount_specified < 0)
    }

    /// Same request with a different signed amount.
    #[must_use]
    pub const fn with_amount(&self, amount_specified: i128) -> Self {
        Self::new(self.zero_for_one, amount_specified, self.sqrt_price_limit)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn exact_in_is_negative() {
        let Ok(p) = SwapParams::exact_in(true, 500, SqrtPrice::MIN_LIMIT) else {
            panic!("expected Ok");
        };
        assert_eq!(p.amount_specified(), -500);
        assert_eq!(p.swap_type(), SwapType::ExactIn);
        assert!(p.specified_is_currency0());
    }

    #[test]
    fn exact_out_is_positive() {
        let Ok(p) = SwapParams::exact_out(true, 500, SqrtPrice::MIN_LIMIT) else {
            panic!("expected Ok");
        };
        assert_eq!(p.amount_specified(), 500);
        assert_eq!(p.swap_type(), SwapType::ExactOut);
        assert!(!p.specified_is_currency0());
    }

    #[test]
    fn one_for_zero_specified_side() {
        let Ok(p) = SwapParams::exact_in(false, 1, SqrtPrice::MAX_LIMIT) else {
            panic!("expected Ok");
        };
        assert!(!p.specified_is_currency0());
        let Ok(p) = SwapParams::exact_out(false, 1, SqrtPrice::MAX_LIMIT) else {
            panic!("expected Ok");
        };
        assert!(p.specified_is_currency0());
    }

    #[test]
    fn oversized_amount_rejected() {
        let result = SwapParams::exact_in(true, u128::MAX, SqrtPrice::MIN_LIMIT);
        assert!(matches!(result, Err(FlashError::Overflow(_))));
    }

    #[test]
    fn with_amount_keeps_direction_and_limit() {
        let p = SwapParams::new(false, -10, SqrtPrice::MAX_LIMIT).with_amount(-7);
        assert!(!p.zero_for_one());
        assert_eq!(p.amount_specified(), -7);
        assert_eq!(p.sqrt_price_limit(), SqrtPrice::MAX_LIMIT);
    }

    #[test]
    fn swap_type_display() {
        assert_eq!(SwapType::ExactIn.to_string(), "ExactIn");
        assert_eq!(SwapType::ExactOut.to_string(), "ExactOut");
    }
}
