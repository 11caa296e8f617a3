//! Hook capability flags and lifecycle points.

use core::fmt;
use core::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::domain::Address;
use crate::error::{FlashError, Result};

/// Bitset of the lifecycle points a policy wants to observe, plus the
/// points at which it may return a delta.
///
/// # Examples
///
/// ```
/// use hydra_flash::hooks::HookFlags;
///
/// let flags = HookFlags::BEFORE_SWAP | HookFlags::BEFORE_SWAP_RETURNS_DELTA;
/// assert!(flags.contains(HookFlags::BEFORE_SWAP));
/// assert!(flags.validate().is_ok());
/// assert!(HookFlags::AFTER_SWAP_RETURNS_DELTA.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HookFlags(u16);

impl HookFlags {
    /// No hooks.
    pub const NONE: Self = Self(0);
    /// Invoke before a pool is initialized.
    pub const BEFORE_INITIALIZE: Self = Self(1 << 0);
    /// Invoke after a pool is initialized.
    pub const AFTER_INITIALIZE: Self = Self(1 << 1);
    /// Invoke before liquidity is added.
    pub const BEFORE_ADD_LIQUIDITY: Self = Self(1 << 2);
    /// Invoke after liquidity is added.
    pub const AFTER_ADD_LIQUIDITY: Self = Self(1 << 3);
    /// Invoke before liquidity is removed or a position is poked.
    pub const BEFORE_REMOVE_LIQUIDITY: Self = Self(1 << 4);
    /// Invoke after liquidity is removed or a position is poked.
    pub const AFTER_REMOVE_LIQUIDITY: Self = Self(1 << 5);
    /// Invoke before a swap.
    pub const BEFORE_SWAP: Self = Self(1 << 6);
    /// Invoke after a swap.
    pub const AFTER_SWAP: Self = Self(1 << 7);
    /// Invoke before a donation.
    pub const BEFORE_DONATE: Self = Self(1 << 8);
    /// Invoke after a donation.
    pub const AFTER_DONATE: Self = Self(1 << 9);
    /// `before_swap` may return a delta or a modified amount.
    pub const BEFORE_SWAP_RETURNS_DELTA: Self = Self(1 << 10);
    /// `after_swap` may return a delta.
    pub const AFTER_SWAP_RETURNS_DELTA: Self = Self(1 << 11);
    /// `before_add_liquidity` may return a delta or a modified amount.
    pub const BEFORE_ADD_LIQUIDITY_RETURNS_DELTA: Self = Self(1 << 12);
    /// `after_add_liquidity` may return a delta.
    pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA: Self = Self(1 << 13);
    /// `before_remove_liquidity` may return a delta or a modified amount.
    pub const BEFORE_REMOVE_LIQUIDITY_RETURNS_DELTA: Self = Self(1 << 14);
    /// `after_remove_liquidity` may return a delta.
    pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA: Self = Self(1 << 15);

    /// Builds flags from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Rejects a returns-delta flag whose lifecycle flag is missing.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidHookFlags`] naming the orphaned flag.
    pub fn validate(&self) -> Result<()> {
        for point in HookPoint::ALL {
            if let Some(delta_flag) = point.returns_delta_flag() {
                if self.contains(delta_flag) && !self.contains(point.flag()) {
                    return Err(FlashError::InvalidHookFlags(point.orphan_message()));
                }
            }
        }
        Ok(())
    }
}

impl BitOr for HookFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A lifecycle point at which a pool's policy may be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPoint {
    /// Before `initialize`.
    BeforeInitialize,
    /// After `initialize`.
    AfterInitialize,
    /// Before liquidity is added.
    BeforeAddLiquidity,
    /// After liquidity is added.
    AfterAddLiquidity,
    /// Before liquidity is removed.
    BeforeRemoveLiquidity,
    /// After liquidity is removed.
    AfterRemoveLiquidity,
    /// Before a swap.
    BeforeSwap,
    /// After a swap.
    AfterSwap,
    /// Before a donation.
    BeforeDonate,
    /// After a donation.
    AfterDonate,
}

impl HookPoint {
    /// Every point, in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::BeforeInitialize,
        Self::AfterInitialize,
        Self::BeforeAddLiquidity,
        Self::AfterAddLiquidity,
        Self::BeforeRemoveLiquidity,
        Self::AfterRemoveLiquidity,
        Self::BeforeSwap,
        Self::AfterSwap,
        Self::BeforeDonate,
        Self::AfterDonate,
    ];

    /// Flag that enables invocation at this point.
    #[must_use]
    pub const fn flag(&self) -> HookFlags {
        match self {
            Self::BeforeInitialize => HookFlags::BEFORE_INITIALIZE,
            Self::AfterInitialize => HookFlags::AFTER_INITIALIZE,
            Self::BeforeAddLiquidity => HookFlags::BEFORE_ADD_LIQUIDITY,
            Self::AfterAddLiquidity => HookFlags::AFTER_ADD_LIQUIDITY,
            Self::BeforeRemoveLiquidity => HookFlags::BEFORE_REMOVE_LIQUIDITY,
            Self::AfterRemoveLiquidity => HookFlags::AFTER_REMOVE_LIQUIDITY,
            Self::BeforeSwap => HookFlags::BEFORE_SWAP,
            Self::AfterSwap => HookFlags::AFTER_SWAP,
            Self::BeforeDonate => HookFlags::BEFORE_DONATE,
            Self::AfterDonate => HookFlags::AFTER_DONATE,
        }
    }

    /// Flag that lets the policy return a delta here, if the point supports
    /// one at all.
    #[must_use]
    pub const fn returns_delta_flag(&self) -> Option<HookFlags> {
        match self {
            Self::BeforeSwap => Some(HookFlags::BEFORE_SWAP_RETURNS_DELTA),
            Self::AfterSwap => Some(HookFlags::AFTER_SWAP_RETURNS_DELTA),
            Self::BeforeAddLiquidity => Some(HookFlags::BEFORE_ADD_LIQUIDITY_RETURNS_DELTA),
            Self::AfterAddLiquidity => Some(HookFlags::AFTER_ADD_LIQUIDITY_RETURNS_DELTA),
            Self::BeforeRemoveLiquidity => Some(HookFlags::BEFORE_REMOVE_LIQUIDITY_RETURNS_DELTA),
            Self::AfterRemoveLiquidity => Some(HookFlags::AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA),
            Self::BeforeInitialize
            | Self::AfterInitialize
            | Self::BeforeDonate
            | Self::AfterDonate => None,
        }
    }

    /// Returns `true` where a policy may substitute the requested amount.
    #[must_use]
    pub const fn accepts_modified_amount(&self) -> bool {
        matches!(
            self,
            Self::BeforeSwap | Self::BeforeAddLiquidity | Self::BeforeRemoveLiquidity
        )
    }

    const fn orphan_message(&self) -> &'static str {
        match self {
            Self::BeforeSwap => "beforeSwapReturnsDelta requires beforeSwap",
            Self::AfterSwap => "afterSwapReturnsDelta requires afterSwap",
            Self::BeforeAddLiquidity => {
                "beforeAddLiquidityReturnsDelta requires beforeAddLiquidity"
            }
            Self::AfterAddLiquidity => "afterAddLiquidityReturnsDelta requires afterAddLiquidity",
            Self::BeforeRemoveLiquidity => {
                "beforeRemoveLiquidityReturnsDelta requires beforeRemoveLiquidity"
            }
            Self::AfterRemoveLiquidity => {
                "afterRemoveLiquidityReturnsDelta requires afterRemoveLiquidity"
            }
            Self::BeforeInitialize
            | Self::AfterInitialize
            | Self::BeforeDonate
            | Self::AfterDonate => "no returns-delta flag exists for this point",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BeforeInitialize => "beforeInitialize",
            Self::AfterInitialize => "afterInitialize",
            Self::BeforeAddLiquidity => "beforeAddLiquidity",
            Self::AfterAddLiquidity => "afterAddLiquidity",
            Self::BeforeRemoveLiquidity => "beforeRemoveLiquidity",
            Self::AfterRemoveLiquidity => "afterRemoveLiquidity",
            Self::BeforeSwap => "beforeSwap",
            Self::AfterSwap => "afterSwap",
            Self::BeforeDonate => "beforeDonate",
            Self::AfterDonate => "afterDonate",
        };
        f.write_str(name)
    }
}

/// Hook configuration cached in a pool at initialization: the policy's
/// address and the flags it declared then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookConfig {
    address: Address,
    flags: HookFlags,
}

impl HookConfig {
    /// Creates a configuration.
    #[must_use]
    pub const fn new(address: Address, flags: HookFlags) -> Self {
        Self { address, flags }
    }

    /// Policy address; also the ledger identity of hook deltas.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Declared flags.
    #[must_use]
    pub const fn flags(&self) -> HookFlags {
        self.flags
    }

    /// Returns `true` if the policy is invoked at `point`.
    #[must_use]
    pub const fn is_enabled(&self, point: HookPoint) -> bool {
        self.flags.contains(point.flag())
    }

    /// Returns `true` if the policy may return a delta at `point`.
    #[must_use]
    pub const fn may_return_delta(&self, point: HookPoint) -> bool {
        match point.returns_delta_flag() {
            Some(flag) => self.flags.contains(flag),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_distinct_bits() {
        let mut seen = 0u16;
        for point in HookPoint::ALL {
            let bits = point.flag().bits();
            assert_eq!(bits.count_ones(), 1);
            assert_eq!(seen & bits, 0);
            seen |= bits;
            if let Some(delta) = point.returns_delta_flag() {
                assert_eq!(seen & delta.bits(), 0);
                seen |= delta.bits();
            }
        }
        assert_eq!(seen, u16::MAX);
    }

    #[test]
    fn orphaned_delta_flag_rejected() {
        assert!(HookFlags::NONE.validate().is_ok());
        assert!((HookFlags::AFTER_SWAP | HookFlags::AFTER_SWAP_RETURNS_DELTA)
            .validate()
            .is_ok());
        assert_eq!(
            HookFlags::BEFORE_ADD_LIQUIDITY_RETURNS_DELTA.validate(),
            Err(FlashError::InvalidHookFlags(
                "beforeAddLiquidityReturnsDelta requires beforeAddLiquidity"
            ))
        );
    }

    #[test]
    fn config_queries() {
        let config = HookConfig::new(
            Address::from_low_byte(3),
            HookFlags::BEFORE_SWAP | HookFlags::BEFORE_SWAP_RETURNS_DELTA | HookFlags::AFTER_SWAP,
        );
        assert!(config.is_enabled(HookPoint::BeforeSwap));
        assert!(config.is_enabled(HookPoint::AfterSwap));
        assert!(!config.is_enabled(HookPoint::BeforeDonate));
        assert!(config.may_return_delta(HookPoint::BeforeSwap));
        assert!(!config.may_return_delta(HookPoint::AfterSwap));
        assert!(!config.may_return_delta(HookPoint::AfterDonate));
    }

    #[test]
    fn modified_amounts_only_before_amount_points() {
        let accepting: Vec<HookPoint> = HookPoint::ALL
            .into_iter()
            .filter(HookPoint::accepts_modified_amount)
            .collect();
        assert_eq!(
            accepting,
            vec![
                HookPoint::BeforeAddLiquidity,
                HookPoint::BeforeRemoveLiquidity,
                HookPoint::BeforeSwap
            ]
        );
    }

    #[test]
    fn display_is_camel_case() {
        assert_eq!(HookPoint::AfterRemoveLiquidity.to_string(), "afterRemoveLiquidity");
    }
}
