//! Two-currency signed amounts returned by pool operations.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlashError;

/// The caller-visible result of one operation: one signed amount per pool
/// currency.
///
/// The sign is caller-centric. A negative component is owed by the caller to
/// the manager, a positive component is owed by the manager to the caller.
/// The ledger stores the opposite sign (positive = owed to the manager), so
/// applying a delta to the ledger negates it.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::BalanceDelta;
///
/// let paid = BalanceDelta::new(-100, 0);
/// let received = BalanceDelta::new(0, 97);
/// let net = paid.checked_add(received).unwrap_or(BalanceDelta::ZERO);
/// assert_eq!(net, BalanceDelta::new(-100, 97));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BalanceDelta {
    amount0: i128,
    amount1: i128,
}

impl BalanceDelta {
    /// No movement in either currency.
    pub const ZERO: Self = Self {
        amount0: 0,
        amount1: 0,
    };

    /// Creates a delta from its two components.
    #[must_use]
    pub const fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }

    /// Amount of `currency0`.
    #[must_use]
    pub const fn amount0(&self) -> i128 {
        self.amount0
    }

    /// Amount of `currency1`.
    #[must_use]
    pub const fn amount1(&self) -> i128 {
        self.amount1
    }

    /// Component for `currency0` when `zero` is `true`, else for `currency1`.
    #[must_use]
    pub const fn amount_for(&self, zero: bool) -> i128 {
        if zero {
            self.amount0
        } else {
            self.amount1
        }
    }

    /// Returns `true` when both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount0 == 0 && self.amount1 == 0
    }

    /// Component-wise checked addition.
    ///
    /// Returns `None` if either component overflows.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match (
            self.amount0.checked_add(other.amount0),
            self.amount1.checked_add(other.amount1),
        ) {
            (Some(amount0), Some(amount1)) => Some(Self { amount0, amount1 }),
            _ => None,
        }
    }

    /// Component-wise checked subtraction.
    ///
    /// Returns `None` if either component overflows.
    #[must_use]
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match (
            self.amount0.checked_sub(other.amount0),
            self.amount1.checked_sub(other.amount1),
        ) {
            (Some(amount0), Some(amount1)) => Some(Self { amount0, amount1 }),
            _ => None,
        }
    }

    /// Component-wise checked negation.
    #[must_use]
    pub const fn checked_neg(&self) -> Option<Self> {
        match (self.amount0.checked_neg(), self.amount1.checked_neg()) {
            (Some(amount0), Some(amount1)) => Some(Self { amount0, amount1 }),
            _ => None,
        }
    }

    /// Checked addition reporting [`FlashError::DeltaOverflow`].
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::DeltaOverflow`] if either component overflows.
    pub fn try_add(&self, other: Self) -> crate::error::Result<Self> {
        self.checked_add(other).ok_or(FlashError::DeltaOverflow)
    }

    /// Checked subtraction reporting [`FlashError::DeltaOverflow`].
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::DeltaOverflow`] if either component overflows.
    pub fn try_sub(&self, other: Self) -> crate::error::Result<Self> {
        self.checked_sub(other).ok_or(FlashError::DeltaOverflow)
    }
}

impl fmt::Display for BalanceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.amount0, self.amount1)
    }
}
