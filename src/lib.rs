//! # Hydra Flash
//!
//! Singleton concentrated-liquidity pool manager with flash accounting and
//! policy hooks.
//!
//! One [`PoolManager`](manager::PoolManager) hosts any number of pools. All
//! mutating work happens inside a session opened with
//! [`PoolManager::open`](manager::PoolManager::open): swaps, liquidity
//! changes and donations only record what each identity owes or is owed in a
//! per-currency ledger. Token movement is settled once, at the end, and the
//! session refuses to close until every entry is back at zero. A failed
//! session leaves no trace.
//!
//! Pools may name a policy (a [`Hooks`](traits::Hooks) implementation) that
//! is invoked at lifecycle points enabled by its flags. A policy may adjust
//! an operation, but anything it takes or gives is booked under its own
//! identity.
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_flash::prelude::*;
//!
//! let mut manager = PoolManager::default();
//! let lp = Address::from_low_byte(0xA1);
//! let key = PoolKey::new(
//!     Currency::Token(Address::from_low_byte(1)),
//!     Currency::Token(Address::from_low_byte(2)),
//!     FeeTier::MEDIUM,
//!     60,
//!     Address::ZERO,
//! )?;
//! manager.initialize(lp, key, SqrtPrice::ONE)?;
//!
//! let delta = manager.open(lp, |m, token| {
//!     // Provide liquidity around the current price and pay for it.
//!     let range = ModifyLiquidityParams::new(-60, 60, 1_000_000_000_000_000_000, Salt::ZERO);
//!     let added = m.modify_liquidity(token, &key, range, &[])?;
//!     m.settle(token, key.currency0(), added.delta.amount0().unsigned_abs())?;
//!     m.settle(token, key.currency1(), added.delta.amount1().unsigned_abs())?;
//!
//!     // Sell one million units of currency0, then settle both sides.
//!     let params = SwapParams::exact_in(true, 1_000_000, SqrtPrice::MIN_LIMIT)?;
//!     let delta = m.swap(token, &key, params, &[])?;
//!     m.settle(token, key.currency0(), 1_000_000)?;
//!     m.take(token, key.currency1(), lp, delta.amount1().unsigned_abs())?;
//!     Ok(delta)
//! })?;
//!
//! assert_eq!(delta, BalanceDelta::new(-1_000_000, 996_999));
//! assert!(!manager.is_locked());
//! # Ok::<(), FlashError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller    │  open(holder, |manager, token| { ... })
//! └──────┬───────┘
//!        │ swap / modify_liquidity / donate / settle / take
//!        ▼
//! ┌──────────────┐      ┌──────────────┐
//! │ PoolManager  │ ───▶ │    Hooks     │  policy per pool, own ledger identity
//! └──────┬───────┘      └──────────────┘
//!        │ CurrencyLedger + custody
//!        ▼
//! ┌──────────────┐
//! │  PoolStore   │  PoolState: ticks, positions, fee growth
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Math     │  Q64.64 sqrt prices, tick math, swap steps
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Currency`](domain::Currency), [`PoolKey`](domain::PoolKey), [`BalanceDelta`](domain::BalanceDelta), etc. |
//! | [`math`] | 256-bit mul-div, tick math, sqrt price math, swap steps |
//! | [`pools`] | [`PoolState`](pools::PoolState) and the curve engine |
//! | [`hooks`] | Flags, results, [`HookContext`](hooks::HookContext) and the registry |
//! | [`traits`] | The [`Hooks`](traits::Hooks) policy trait |
//! | [`manager`] | [`PoolManager`](manager::PoolManager), sessions, ledger and events |
//! | [`config`] | [`ManagerConfig`](config::ManagerConfig) limits, loadable from TOML |
//! | [`error`] | [`FlashError`] unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod manager;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;

pub use error::{ErrorCategory, FlashError, Result};
