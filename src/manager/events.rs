//! Notifications emitted by the manager for indexers and transfer agents.

use serde::Serialize;

use crate::domain::{Address, BalanceDelta, Currency, PoolId, PoolKey, SqrtPrice};

/// One state change, in emission order.
///
/// Events are buffered by the manager and read with
/// [`PoolManager::drain_events`](super::PoolManager::drain_events). Events
/// of a failed operation or session are discarded with its other effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// A pool was created.
    PoolInitialized {
        id: PoolId,
        key: PoolKey,
        sqrt_price: SqrtPrice,
        tick: i32,
    },
    /// A position was modified.
    ModifyLiquidity {
        id: PoolId,
        sender: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
        salt: [u8; 32],
        /// Caller-centric principal plus fees, before hook deltas.
        delta: BalanceDelta,
    },
    /// A swap was executed, against the curve or filled by the pool's
    /// policy.
    Swap {
        id: PoolId,
        sender: Address,
        /// Caller-centric curve delta, before hook deltas. When the policy
        /// filled the whole amount, the caller's net delta.
        delta: BalanceDelta,
        sqrt_price: SqrtPrice,
        tick: i32,
        liquidity: u128,
        fee_pips: u32,
    },
    /// Fees were paid straight to in-range liquidity.
    Donate {
        id: PoolId,
        sender: Address,
        amount0: u128,
        amount1: u128,
    },
    /// Instruction to pay `amount` of `currency` out of custody.
    Transfer {
        currency: Currency,
        sender: Address,
        recipient: Address,
        amount: u128,
    },
}

impl Event {
    /// Pool the event concerns, if any.
    #[must_use]
    pub const fn pool(&self) -> Option<PoolId> {
        match self {
            Self::PoolInitialized { id, .. }
            | Self::ModifyLiquidity { id, .. }
            | Self::Swap { id, .. }
            | Self::Donate { id, .. } => Some(*id),
            Self::Transfer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let event = Event::Transfer {
            currency: Currency::Native,
            sender: Address::from_low_byte(1),
            recipient: Address::from_low_byte(2),
            amount: 5,
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["kind"], "transfer");
        assert_eq!(json["amount"], 5);
        assert_eq!(event.pool(), None);
    }
}
