//! Currency identifier used as the ledger key.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Address;

/// A currency the manager can account for: the chain's native asset or a
/// token contract.
///
/// Ordering places [`Currency::Native`] before every token, then tokens by
/// address. Pool keys store their two currencies in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// The chain's native asset.
    Native,
    /// A token identified by its contract address.
    Token(Address),
}

impl Currency {
    /// Returns `true` for the native asset.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Returns the token address, or `None` for the native asset.
    #[must_use]
    pub const fn address(&self) -> Option<Address> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }
}

impl From<Address> for Currency {
    fn from(addr: Address) -> Self {
        Self::Token(addr)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_sorts_first() {
        let token = Currency::Token(Address::ZERO);
        assert!(Currency::Native < token);
        let (one, two) = (Address::from_low_byte(1), Address::from_low_byte(2));
        assert!(Currency::Token(one) < Currency::Token(two));
    }

    #[test]
    fn address_accessor() {
        assert_eq!(Currency::Native.address(), None);
        let addr = Address::from_low_byte(9);
        assert_eq!(Currency::from(addr).address(), Some(addr));
        assert!(!Currency::from(addr).is_native());
    }

    #[test]
    fn display() {
        assert_eq!(Currency::Native.to_string(), "native");
        assert!(Currency::Token(Address::from_low_byte(1))
            .to_string()
            .starts_with("token:0x"));
    }
}
