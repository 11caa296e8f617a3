//! Liquidity modification request parameters.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Salt;

/// Direction of a liquidity modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// Positive liquidity delta.
    Add,
    /// Negative liquidity delta.
    Remove,
    /// Zero delta: collect accrued fees without changing liquidity.
    Poke,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "Add"),
            Self::Remove => write!(f, "Remove"),
            Self::Poke => write!(f, "Poke"),
        }
    }
}

/// A request to change one position's liquidity.
///
/// `liquidity_delta` is signed: positive adds, negative removes, zero pokes
/// the position to pay out accrued fees.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::{ChangeType, ModifyLiquidityParams, Salt};
///
/// let add = ModifyLiquidityParams::new(-60, 60, 1_000, Salt::ZERO);
/// assert_eq!(add.change_type(), ChangeType::Add);
/// assert_eq!(add.with_liquidity_delta(-1_000).change_type(), ChangeType::Remove);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifyLiquidityParams {
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
    salt: Salt,
}

impl ModifyLiquidityParams {
    /// Creates parameters. Range validity is checked by the manager.
    #[must_use]
    pub const fn new(tick_lower: i32, tick_upper: i32, liquidity_delta: i128, salt: Salt) -> Self {
        Self {
            tick_lower,
            tick_upper,
            liquidity_delta,
            salt,
        }
    }

    /// Lower tick bound.
    #[must_use]
    pub const fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    /// Upper tick bound.
    #[must_use]
    pub const fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    /// Signed liquidity change.
    #[must_use]
    pub const fn liquidity_delta(&self) -> i128 {
        self.liquidity_delta
    }

    /// Position salt.
    #[must_use]
    pub const fn salt(&self) -> Salt {
        self.salt
    }

    /// Classifies the request by the sign of its delta.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        if self.liquidity_delta > 0 {
            ChangeType::Add
        } else if self.liquidity_delta < 0 {
            ChangeType::Remove
        } else {
            ChangeType::Poke
        }
    }

    /// Same request with a different liquidity delta.
    #[must_use]
    pub const fn with_liquidity_delta(&self, liquidity_delta: i128) -> Self {
        Self::new(self.tick_lower, self.tick_upper, liquidity_delta, self.salt)
    }
}
