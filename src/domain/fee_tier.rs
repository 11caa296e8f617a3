//! Liquidity-provider fee tiers expressed in pips.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of pips in 100%.
pub const PIPS_DENOMINATOR: u32 = 1_000_000;

/// A swap fee charged to traders and paid to in-range liquidity, in
/// hundredths of a basis point (`3000` pips = 0.30%).
///
/// Any `u32` can be wrapped; [`is_valid`](Self::is_valid) reports whether it
/// is at most 100%. The manager additionally caps tiers with its configured
/// maximum when a pool is initialized.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::FeeTier;
///
/// let tier = FeeTier::MEDIUM;
/// assert_eq!(tier.pips(), 3_000);
/// assert!(tier.is_valid());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct FeeTier(u32);

impl FeeTier {
    /// 0.01%: pegged pairs.
    pub const LOWEST: Self = Self(100);

    /// 0.05%: stable pairs.
    pub const LOW: Self = Self(500);

    /// 0.30%: standard volatile pairs.
    pub const MEDIUM: Self = Self(3_000);

    /// 1.00%: exotic pairs.
    pub const HIGH: Self = Self(10_000);

    /// Creates a tier from raw pips.
    #[must_use]
    pub const fn from_pips(pips: u32) -> Self {
        Self(pips)
    }

    /// Returns the fee in pips.
    #[must_use]
    pub const fn pips(&self) -> u32 {
        self.0
    }

    /// Returns `true` when the fee does not exceed 100%.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 <= PIPS_DENOMINATOR
    }

    /// Returns `true` for a 100% fee, under which exact-output swaps are
    /// impossible.
    #[must_use]
    pub const fn is_total(&self) -> bool {
        self.0 == PIPS_DENOMINATOR
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}%", self.0 / 10_000, self.0 % 10_000)
    }
}
