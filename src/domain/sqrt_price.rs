//! Q64.64 fixed-point square-root price.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlashError;

/// Raw value of `sqrt_price_at_tick(MIN_TICK)`.
pub const MIN_SQRT_PRICE: u128 = 4_295_048_017;

/// Raw value of `sqrt_price_at_tick(MAX_TICK)`.
pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_062;

/// `2^64`, the Q64.64 representation of `1.0`.
pub const Q64: u128 = 1 << 64;

/// The square root of `currency1 / currency0`, as an unsigned Q64.64
/// fixed-point number.
///
/// The value is monotonic in the tick index and invertible through
/// [`tick_at_sqrt_price`](crate::math::tick_at_sqrt_price). Constructed
/// values always lie in `[MIN, MAX]`.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::SqrtPrice;
///
/// let one = SqrtPrice::ONE;
/// assert!((one.to_price() - 1.0).abs() < 1e-12);
/// assert!(SqrtPrice::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SqrtPrice(u128);

impl SqrtPrice {
    /// Lowest representable price, at the minimum tick.
    pub const MIN: Self = Self(MIN_SQRT_PRICE);

    /// Highest representable price, at the maximum tick.
    pub const MAX: Self = Self(MAX_SQRT_PRICE);

    /// Price `1.0`.
    pub const ONE: Self = Self(Q64);

    /// Most permissive limit for a `zero_for_one` swap.
    pub const MIN_LIMIT: Self = Self(MIN_SQRT_PRICE + 1);

    /// Most permissive limit for a `one_for_zero` swap.
    pub const MAX_LIMIT: Self = Self(MAX_SQRT_PRICE - 1);

    /// Wraps a raw Q64.64 value.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidPrice`] outside `[MIN, MAX]`.
    pub fn new(raw: u128) -> crate::error::Result<Self> {
        if raw < MIN_SQRT_PRICE || raw > MAX_SQRT_PRICE {
            return Err(FlashError::InvalidPrice("sqrt price outside [MIN, MAX]"));
        }
        Ok(Self(raw))
    }

    /// Wraps a value the caller has already range-checked.
    pub(crate) const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw Q64.64 value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Approximate spot price `currency1 / currency0` as `f64`.
    ///
    /// For display and tests only; never used in accounting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_price(&self) -> f64 {
        let sqrt = self.0 as f64 / Q64 as f64;
        sqrt * sqrt
    }
}

impl fmt::Display for SqrtPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqrtPrice({})", self.0)
    }
}
