//! Chain-agnostic account and contract identity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte identity: token contracts, hook policies, session holders and
/// position owners all use the same address space.
///
/// All byte sequences are valid, so construction is infallible. The all-zero
/// address is reserved as "no hook policy" in a [`PoolKey`](super::PoolKey).
///
/// # Examples
///
/// ```
/// use hydra_flash::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(Address::ZERO.is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds an address whose last byte is `tag` and all others are zero.
    ///
    /// Handy for fixtures and simulations.
    #[must_use]
    pub const fn from_low_byte(tag: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[31] = tag;
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the all-zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(Address::default(), Address::ZERO);
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_byte(1).is_zero());
    }

    #[test]
    fn low_byte_tag() {
        let addr = Address::from_low_byte(7);
        let bytes = addr.as_bytes();
        assert_eq!(bytes[31], 7);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Address::from_low_byte(1) < Address::from_low_byte(2));
        assert!(Address::from_low_byte(255) < Address::from_bytes([1u8; 32]));
    }

    #[test]
    fn display_is_prefixed_hex() {
        let shown = Address::from_low_byte(0xab).to_string();
        assert!(shown.starts_with("0x"));
        assert!(shown.ends_with("ab"));
        assert_eq!(shown.len(), 2 + 64);
    }
}
