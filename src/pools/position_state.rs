//! Per-position liquidity and fee checkpoints.

use crate::domain::Q64;
use crate::error::Result;
use crate::math::{add_delta, mul_div_u128, Rounding};

/// State of one liquidity position.
///
/// Fees are never left to accumulate here: every modification settles the
/// fees earned since the previous one and moves the checkpoints forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionState {
    liquidity: u128,
    fee_growth_inside0_last: u128,
    fee_growth_inside1_last: u128,
}

impl PositionState {
    /// Liquidity held by the position.
    #[must_use]
    pub const fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Fee growth inside the range of `currency0` at the last update.
    #[must_use]
    pub const fn fee_growth_inside0_last(&self) -> u128 {
        self.fee_growth_inside0_last
    }

    /// Fee growth inside the range of `currency1` at the last update.
    #[must_use]
    pub const fn fee_growth_inside1_last(&self) -> u128 {
        self.fee_growth_inside1_last
    }

    /// Fees earned by the current liquidity since the last checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FlashError::Overflow`] if an amount exceeds `u128`.
    pub fn fees_owed(
        &self,
        fee_growth_inside0: u128,
        fee_growth_inside1: u128,
    ) -> Result<(u128, u128)> {
        let owed = |inside: u128, last: u128| {
            mul_div_u128(inside.wrapping_sub(last), self.liquidity, Q64, Rounding::Down)
        };
        Ok((
            owed(fee_growth_inside0, self.fee_growth_inside0_last)?,
            owed(fee_growth_inside1, self.fee_growth_inside1_last)?,
        ))
    }

    /// Applies `liquidity_delta`, returning the fees owed to the position up
    /// to this point, and records the new checkpoints.
    ///
    /// # Errors
    ///
    /// - [`crate::FlashError::Underflow`] if the delta removes more than the
    ///   position holds.
    /// - [`crate::FlashError::Overflow`] on oversized amounts.
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside0: u128,
        fee_growth_inside1: u128,
    ) -> Result<(u128, u128)> {
        let fees = self.fees_owed(fee_growth_inside0, fee_growth_inside1)?;
        self.liquidity = add_delta(self.liquidity, liquidity_delta)?;
        self.fee_growth_inside0_last = fee_growth_inside0;
        self.fee_growth_inside1_last = fee_growth_inside1;
        Ok(fees)
    }
}
