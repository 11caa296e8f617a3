//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_flash::prelude::*;
//! ```
//!
//! Brings the domain value types, the manager and its session token, the
//! policy trait with its flags and results, the configuration and the error
//! types into scope with one import.

pub use crate::domain::{
    Address, BalanceDelta, Currency, FeeTier, ModifyLiquidityParams, PoolId, PoolKey, Salt,
    SqrtPrice, SwapParams, Tick,
};

pub use crate::config::ManagerConfig;

pub use crate::hooks::{HookContext, HookFlags, HookPoint, HookResult};

pub use crate::manager::{Event, ModifyLiquidityOutcome, PoolManager, SessionToken};

pub use crate::pools::{PoolState, PositionState};

pub use crate::traits::Hooks;

pub use crate::error::{ErrorCategory, FlashError, Result};
