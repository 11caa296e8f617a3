//! Unified error type for the pool manager.
//!
//! Every fallible operation in the crate returns [`Result<T>`], an alias for
//! `core::result::Result<T, FlashError>`. Variants are grouped by
//! [`ErrorCategory`]:
//!
//! | Category | Meaning | Examples |
//! |----------|---------|----------|
//! | `Protocol` | session or ledger invariant at risk | `AlreadyLocked`, `CurrencyNotSettled` |
//! | `Validation` | invalid request | `InvalidTickRange`, `InvalidSwapAmount` |
//! | `Policy` | a hook misbehaved or vetoed the operation | `HookDeltaNotAuthorized` |
//! | `Arithmetic` | a checked computation left its domain | `DeltaOverflow`, `Overflow` |
//! | `Configuration` | a manager configuration was rejected | `InvalidConfiguration` |
//!
//! Nothing is retried inside the crate. An error unwinds every mutation
//! performed since the start of the smallest atomic unit: the operation, or
//! the whole session when the session callback does not handle it.

use core::fmt;

use thiserror::Error;

use crate::domain::Currency;
use crate::hooks::HookPoint;

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, FlashError>;

/// Coarse classification of a [`FlashError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Session or ledger invariant violation.
    Protocol,
    /// Invalid request parameters.
    Validation,
    /// Hook failure or veto.
    Policy,
    /// Checked arithmetic failure.
    Arithmetic,
    /// Rejected configuration.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Protocol => "protocol",
            Self::Validation => "validation",
            Self::Policy => "policy",
            Self::Arithmetic => "arithmetic",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Every failure the pool manager can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlashError {
    // -- Protocol -----------------------------------------------------------
    /// A session is already open; sessions never nest.
    #[error("a session is already open")]
    AlreadyLocked,

    /// The operation requires an open session held by the caller.
    #[error("operation requires an open session held by the caller")]
    ManagerLocked,

    /// The session tried to close with an outstanding ledger entry.
    #[error("currency {currency} not settled: {amount} outstanding")]
    CurrencyNotSettled {
        /// First currency found with a non-zero entry.
        currency: Currency,
        /// Outstanding amount (positive = owed to the manager).
        amount: i128,
    },

    /// A ledger entry left the `i128` range.
    #[error("currency delta overflow")]
    DeltaOverflow,

    /// A settlement would pay in more than the entry owes.
    #[error("over-settlement of {currency}: owed {owed}, paid {amount}")]
    OverSettlement {
        /// Currency being settled.
        currency: Currency,
        /// Amount owed before the settlement.
        owed: i128,
        /// Amount the caller tried to settle.
        amount: u128,
    },

    /// The manager does not custody enough of the currency to pay out.
    #[error("insufficient reserves of {0}")]
    InsufficientReserves(Currency),

    /// A synced settlement claimed more than was actually transferred in.
    #[error("settlement exceeds the amount transferred since sync")]
    UnpaidSettlement,

    /// An observed balance is below the tracked reserves.
    #[error("observed balance is below tracked reserves")]
    ReserveShortfall,

    /// `clear` must forfeit exactly the outstanding credit.
    #[error("clear must forfeit exactly the outstanding credit")]
    MustClearExactCredit,

    /// A burn exceeds the owner's claim balance.
    #[error("insufficient claim balance")]
    InsufficientClaimBalance,

    // -- Validation ---------------------------------------------------------
    /// The pool has not been initialized.
    #[error("pool not initialized")]
    PoolNotInitialized,

    /// A pool with the same identifier already exists.
    #[error("pool already initialized")]
    PoolAlreadyInitialized,

    /// Fee tier or tick spacing outside the accepted range.
    #[error("invalid fee or tick spacing: {0}")]
    InvalidFeeOrSpacing(&'static str),

    /// The currency pair is not usable as a pool key.
    #[error("invalid currency pair: {0}")]
    InvalidCurrencyPair(&'static str),

    /// Position bounds are unordered, misaligned or out of range.
    #[error("invalid tick range: {0}")]
    InvalidTickRange(&'static str),

    /// A tick index is outside the supported domain.
    #[error("invalid tick: {0}")]
    InvalidTick(&'static str),

    /// A swap requested a zero amount.
    #[error("swap amount must be non-zero")]
    InvalidSwapAmount,

    /// The swap price limit is on the wrong side of the price or out of bounds.
    #[error("invalid price limit: {0}")]
    InvalidPriceLimit(&'static str),

    /// A sqrt price is outside the supported domain.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// Not enough liquidity to satisfy the request.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The referenced position holds no liquidity.
    #[error("position not found")]
    PositionNotFound,

    /// A donation targeted a pool with no active liquidity.
    #[error("no active liquidity to receive fees")]
    NoLiquidityToReceiveFees,

    // -- Policy -------------------------------------------------------------
    /// A hook returned a delta or amount without the matching permission.
    #[error("hook returned a delta at {0} without permission")]
    HookDeltaNotAuthorized(HookPoint),

    /// A hook returned a result that makes no sense at this point.
    #[error("invalid hook response at {point}: {reason}")]
    HookInvalidResponse {
        /// Lifecycle point that produced the response.
        point: HookPoint,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A hook vetoed the operation.
    #[error("hook rejected operation at {point}: {reason}")]
    HookRejected {
        /// Lifecycle point that vetoed.
        point: HookPoint,
        /// Reason supplied by the hook.
        reason: String,
    },

    /// The pool key names a hook address with no registered policy.
    #[error("no hooks registered at the pool's hook address")]
    HookNotRegistered,

    /// A policy declared an inconsistent set of capability flags.
    #[error("invalid hook flags: {0}")]
    InvalidHookFlags(&'static str),

    // -- Arithmetic ---------------------------------------------------------
    /// A checked computation overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A checked computation underflowed.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- Configuration ------------------------------------------------------
    /// The manager configuration is invalid or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl FlashError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyLocked
            | Self::ManagerLocked
            | Self::CurrencyNotSettled { .. }
            | Self::OverSettlement { .. }
            | Self::InsufficientReserves(_)
            | Self::UnpaidSettlement
            | Self::ReserveShortfall
            | Self::MustClearExactCredit
            | Self::InsufficientClaimBalance => ErrorCategory::Protocol,
            Self::PoolNotInitialized
            | Self::PoolAlreadyInitialized
            | Self::InvalidFeeOrSpacing(_)
            | Self::InvalidCurrencyPair(_)
            | Self::InvalidTickRange(_)
            | Self::InvalidTick(_)
            | Self::InvalidSwapAmount
            | Self::InvalidPriceLimit(_)
            | Self::InvalidPrice(_)
            | Self::InsufficientLiquidity
            | Self::PositionNotFound
            | Self::NoLiquidityToReceiveFees => ErrorCategory::Validation,
            Self::HookDeltaNotAuthorized(_)
            | Self::HookInvalidResponse { .. }
            | Self::HookRejected { .. }
            | Self::HookNotRegistered
            | Self::InvalidHookFlags(_) => ErrorCategory::Policy,
            Self::DeltaOverflow | Self::Overflow(_) | Self::Underflow(_) | Self::DivisionByZero => {
                ErrorCategory::Arithmetic
            }
            Self::InvalidConfiguration(_) => ErrorCategory::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(FlashError::AlreadyLocked.category(), ErrorCategory::Protocol);
        assert_eq!(
            FlashError::InvalidTickRange("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            FlashError::HookDeltaNotAuthorized(HookPoint::BeforeSwap).category(),
            ErrorCategory::Policy
        );
        assert_eq!(FlashError::DeltaOverflow.category(), ErrorCategory::Arithmetic);
        assert_eq!(
            FlashError::InvalidConfiguration(String::new()).category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = FlashError::CurrencyNotSettled {
            currency: Currency::Native,
            amount: -42,
        };
        let msg = err.to_string();
        assert!(msg.contains("native"));
        assert!(msg.contains("-42"));

        let err = FlashError::HookDeltaNotAuthorized(HookPoint::AfterSwap);
        assert!(err.to_string().contains("afterSwap"));
    }
}
