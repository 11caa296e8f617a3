//! Tagged responses a policy returns from a lifecycle point.

use crate::domain::BalanceDelta;

/// What a policy wants done after being invoked.
///
/// - [`HookResult::NoOp`]: observe only.
/// - [`HookResult::Delta`]: a caller-centric delta the policy takes on
///   itself. It is booked to the policy's own ledger identity and removed
///   from the caller's result, so the policy can only unbalance its own
///   funds. Negative components are owed by the policy, positive ones are
///   owed to it.
/// - [`HookResult::ModifiedAmount`]: a replacement for the requested amount
///   (swap amount or liquidity delta), accepted only before swaps and
///   liquidity changes. It must keep the sign of the request.
///
/// Any returned value other than `NoOp` needs the matching returns-delta
/// flag on the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookResult {
    /// Observe only.
    #[default]
    NoOp,
    /// Take on a delta under the policy's identity.
    Delta(BalanceDelta),
    /// Replace the requested amount.
    ModifiedAmount(i128),
}

impl HookResult {
    /// Delta carried by this result, or zero.
    #[must_use]
    pub const fn delta(&self) -> BalanceDelta {
        match self {
            Self::Delta(delta) => *delta,
            Self::NoOp | Self::ModifiedAmount(_) => BalanceDelta::ZERO,
        }
    }

    /// Returns `true` for [`HookResult::NoOp`].
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}
