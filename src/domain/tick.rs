//! Discrete price points on the Q64.64 sqrt-price axis.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlashError;

/// Lowest tick whose sqrt price is representable in Q64.64.
pub const MIN_TICK: i32 = -443_636;

/// Highest tick whose sqrt price is representable in Q64.64.
pub const MAX_TICK: i32 = 443_636;

/// Largest tick spacing a pool key may declare.
pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// A validated tick index: `price = 1.0001^tick`.
///
/// Valid indices range from [`MIN`](Self::MIN) (`-443636`) to
/// [`MAX`](Self::MAX) (`443636`), the widest range whose sqrt prices fit a
/// Q64.64 `u128`.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::Tick;
///
/// let tick = Tick::new(-120).unwrap_or(Tick::ZERO);
/// assert!(tick.is_aligned(60));
/// assert!(!tick.is_aligned(50));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Tick(i32);

impl Tick {
    /// Lowest valid tick.
    pub const MIN: Self = Self(MIN_TICK);

    /// Highest valid tick.
    pub const MAX: Self = Self(MAX_TICK);

    /// Tick at price `1.0`.
    pub const ZERO: Self = Self(0);

    /// Creates a tick with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidTick`] when `value` is outside
    /// `[-443636, 443636]`.
    pub fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_TICK || value > MAX_TICK {
            return Err(FlashError::InvalidTick("tick out of range [-443636, 443636]"));
        }
        Ok(Self(value))
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns `true` when the tick is a multiple of `spacing`.
    ///
    /// A non-positive spacing aligns nothing.
    #[must_use]
    pub const fn is_aligned(&self, spacing: i32) -> bool {
        spacing > 0 && self.0 % spacing == 0
    }

    /// Lowest tick usable by positions under `spacing`.
    #[must_use]
    pub const fn min_usable(spacing: i32) -> Self {
        Self((MIN_TICK / spacing) * spacing)
    }

    /// Highest tick usable by positions under `spacing`.
    #[must_use]
    pub const fn max_usable(spacing: i32) -> Self {
        Self((MAX_TICK / spacing) * spacing)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}
