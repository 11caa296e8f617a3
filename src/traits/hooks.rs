//! Policy trait invoked at pool lifecycle points.
//!
//! A policy declares the points it wants through [`Hooks::flags`]. The
//! manager reads the flags once, when a pool naming the policy is
//! initialized, and afterwards only calls the methods whose flag is set.
//! Every method has a default that observes nothing and returns
//! [`HookResult::NoOp`], so a policy implements only what it needs.
//!
//! # Returned values
//!
//! | Result | Accepted at | Requires |
//! |--------|-------------|----------|
//! | `NoOp` | every point | nothing |
//! | `Delta(d)` | swap and liquidity points | the point's returns-delta flag |
//! | `ModifiedAmount(a)` | `before_swap`, `before_*_liquidity` | the returns-delta flag |
//!
//! A delta is booked under the policy's own address, never the caller's.
//! Returning `Err` aborts the enclosing operation; the manager restores
//! every pool and ledger entry the operation touched.
//!
//! # Context
//!
//! The [`HookContext`] passed to every method is bound to the policy's
//! address. It can settle or take the policy's own balances and read pools,
//! but it cannot open a nested session.

use crate::domain::{Address, BalanceDelta, ModifyLiquidityParams, PoolKey, SqrtPrice, SwapParams};
use crate::error::Result;
use crate::hooks::{HookContext, HookFlags, HookResult};

/// An external policy attached to pools by address.
///
/// Implementors must be `Send + Sync` so a registry can be shared.
pub trait Hooks: Send + Sync {
    /// Lifecycle points this policy wants to be invoked at.
    fn flags(&self) -> HookFlags;

    /// Called before a pool is created.
    ///
    /// # Errors
    ///
    /// Any error vetoes the initialization.
    fn before_initialize(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _sqrt_price: SqrtPrice,
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called after a pool is created at `tick`.
    ///
    /// # Errors
    ///
    /// Any error vetoes the initialization.
    fn after_initialize(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _sqrt_price: SqrtPrice,
        _tick: i32,
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called before liquidity is added.
    ///
    /// # Errors
    ///
    /// Any error vetoes the operation.
    fn before_add_liquidity(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called after liquidity is added with the caller's net `delta` and the
    /// fees that were paid out to the position.
    ///
    /// # Errors
    ///
    /// Any error vetoes the operation.
    #[allow(clippy::too_many_arguments)]
    fn after_add_liquidity(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        _delta: BalanceDelta,
        _fees_accrued: BalanceDelta,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called before liquidity is removed or a position is poked.
    ///
    /// # Errors
    ///
    /// Any error vetoes the operation.
    fn before_remove_liquidity(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called after liquidity is removed or a position is poked.
    ///
    /// # Errors
    ///
    /// Any error vetoes the operation.
    #[allow(clippy::too_many_arguments)]
    fn after_remove_liquidity(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        _delta: BalanceDelta,
        _fees_accrued: BalanceDelta,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called before a swap.
    ///
    /// # Errors
    ///
    /// Any error vetoes the swap.
    fn before_swap(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &SwapParams,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called after a swap with the curve's caller-centric `delta`.
    ///
    /// # Errors
    ///
    /// Any error vetoes the swap.
    fn after_swap(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _params: &SwapParams,
        _delta: BalanceDelta,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called before a donation.
    ///
    /// # Errors
    ///
    /// Any error vetoes the donation.
    fn before_donate(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _amount0: u128,
        _amount1: u128,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }

    /// Called after a donation.
    ///
    /// # Errors
    ///
    /// Any error vetoes the donation.
    fn after_donate(
        &self,
        _ctx: &mut HookContext<'_>,
        _sender: Address,
        _key: &PoolKey,
        _amount0: u128,
        _amount1: u128,
        _hook_data: &[u8],
    ) -> Result<HookResult> {
        Ok(HookResult::NoOp)
    }
}
