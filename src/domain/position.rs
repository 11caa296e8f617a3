//! Position identity within a pool.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Address;

/// Disambiguator letting one owner hold several positions over the same
/// range. Each salt is an independent accounting unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Salt([u8; 32]);

impl Salt {
    /// The all-zero salt.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a salt from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Salt whose trailing eight bytes hold `n` big-endian.
    #[must_use]
    pub const fn from_u64(n: u64) -> Self {
        let be = n.to_be_bytes();
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// Key of a position inside one pool: `(owner, tick range, salt)`.
///
/// The range is lower-inclusive and upper-exclusive: the position earns fees
/// while `tick_lower <= current_tick < tick_upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    salt: Salt,
}

impl PositionKey {
    /// Creates a key. Range validity is checked by the manager.
    #[must_use]
    pub const fn new(owner: Address, tick_lower: i32, tick_upper: i32, salt: Salt) -> Self {
        Self {
            owner,
            tick_lower,
            tick_upper,
            salt,
        }
    }

    /// Owning identity.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Lower tick bound (inclusive).
    #[must_use]
    pub const fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    /// Upper tick bound (exclusive).
    #[must_use]
    pub const fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    /// Position salt.
    #[must_use]
    pub const fn salt(&self) -> Salt {
        self.salt
    }

    /// Returns `true` while `current_tick` is inside the range.
    #[must_use]
    pub const fn is_in_range(&self, current_tick: i32) -> bool {
        current_tick >= self.tick_lower && current_tick < self.tick_upper
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position({} [{}, {}) salt=0x{})",
            self.owner,
            self.tick_lower,
            self.tick_upper,
            hex::encode(self.salt.0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_separate_positions() {
        let owner = Address::from_low_byte(1);
        let a = PositionKey::new(owner, -60, 60, Salt::ZERO);
        let b = PositionKey::new(owner, -60, 60, Salt::from_u64(1));
        assert_ne!(a, b);
    }

    #[test]
    fn salt_from_u64_is_big_endian_tail() {
        let bytes = Salt::from_u64(0x0102).as_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..24].iter().all(|b| *b == 0));
    }

    #[test]
    fn range_is_half_open() {
        let key = PositionKey::new(Address::ZERO, -60, 60, Salt::ZERO);
        assert!(key.is_in_range(-60));
        assert!(key.is_in_range(59));
        assert!(!key.is_in_range(60));
        assert!(!key.is_in_range(-61));
    }

    #[test]
    fn display_mentions_range() {
        let key = PositionKey::new(Address::ZERO, -60, 60, Salt::ZERO);
        assert!(key.to_string().contains("[-60, 60)"));
    }
}
