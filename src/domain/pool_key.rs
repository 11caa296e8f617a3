//! Pool identity: the canonical key and its hashed identifier.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::{Address, Currency, FeeTier};
use crate::error::FlashError;

/// Everything that distinguishes one pool from another.
///
/// The currency pair is canonically sorted so that `currency0 < currency1`,
/// preventing `(A, B)` and `(B, A)` from describing two pools. Two keys with
/// the same pair, fee, spacing and hook address always hash to the same
/// [`PoolId`]; the manager refuses to initialize an id twice.
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::{Address, Currency, FeeTier, PoolKey};
///
/// let a = Currency::Token(Address::from_low_byte(2));
/// let b = Currency::Token(Address::from_low_byte(1));
/// let key = PoolKey::new(a, b, FeeTier::MEDIUM, 60, Address::ZERO).expect("distinct");
/// assert_eq!(key.currency0(), b);
/// assert_eq!(key.currency1(), a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    currency0: Currency,
    currency1: Currency,
    fee: FeeTier,
    tick_spacing: i32,
    hooks: Address,
}

impl PoolKey {
    /// Creates a canonically ordered key.
    ///
    /// Fee and spacing bounds are enforced by the manager at initialization,
    /// against its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidCurrencyPair`] if both currencies are the
    /// same.
    pub fn new(
        currency_a: Currency,
        currency_b: Currency,
        fee: FeeTier,
        tick_spacing: i32,
        hooks: Address,
    ) -> crate::error::Result<Self> {
        if currency_a == currency_b {
            return Err(FlashError::InvalidCurrencyPair(
                "pool requires two distinct currencies",
            ));
        }
        let (currency0, currency1) = if currency_a < currency_b {
            (currency_a, currency_b)
        } else {
            (currency_b, currency_a)
        };
        Ok(Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        })
    }

    /// Lower-ordered currency.
    #[must_use]
    pub const fn currency0(&self) -> Currency {
        self.currency0
    }

    /// Higher-ordered currency.
    #[must_use]
    pub const fn currency1(&self) -> Currency {
        self.currency1
    }

    /// Returns `currency0` when `zero` is `true`, else `currency1`.
    #[must_use]
    pub const fn currency(&self, zero: bool) -> Currency {
        if zero {
            self.currency0
        } else {
            self.currency1
        }
    }

    /// LP fee tier.
    #[must_use]
    pub const fn fee(&self) -> FeeTier {
        self.fee
    }

    /// Tick spacing positions must align to.
    #[must_use]
    pub const fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    /// Hook policy address; zero means no policy.
    #[must_use]
    pub const fn hooks(&self) -> Address {
        self.hooks
    }

    /// Hashes the key into its [`PoolId`].
    ///
    /// Keccak-256 over the tagged currencies, the big-endian fee and spacing,
    /// and the hook address.
    #[must_use]
    pub fn id(&self) -> PoolId {
        let mut hasher = Keccak256::new();
        for currency in [self.currency0, self.currency1] {
            match currency {
                Currency::Native => hasher.update([0u8]),
                Currency::Token(addr) => {
                    hasher.update([1u8]);
                    hasher.update(addr.as_bytes());
                }
            }
        }
        hasher.update(self.fee.pips().to_be_bytes());
        hasher.update(self.tick_spacing.to_be_bytes());
        hasher.update(self.hooks.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        PoolId(bytes)
    }
}

/// Deterministic 32-byte pool identifier derived from a [`PoolKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// Wraps raw identifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
