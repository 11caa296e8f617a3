//! Pool operations run inside a session: `swap`, `modify_liquidity` and
//! `donate`.
//!
//! Every operation follows the same sequence and records how far it got in
//! an [`OperationStage`]:
//!
//! ```text
//! Idle -> ValidityChecked -> BeforeHookRun -> CoreMutationApplied
//!      -> LedgerUpdated -> AfterHookRun -> Settled
//! ```
//!
//! A failure at any stage restores the pool, the ledger, custody and the
//! event buffer to their state before the operation. The session stays
//! open.

use core::fmt;

use tracing::debug;

use super::events::Event;
use super::pool_manager::PoolManager;
use super::session::SessionToken;
use crate::domain::{
    BalanceDelta, ChangeType, ModifyLiquidityParams, PoolKey, SwapParams, SwapType,
};
use crate::error::{FlashError, Result};
use crate::hooks::dispatcher::resolve_amount;
use crate::hooks::HookPoint;

/// How far an operation progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStage {
    /// Nothing checked yet.
    #[default]
    Idle,
    /// Request and pool validated.
    ValidityChecked,
    /// Before-hook returned.
    BeforeHookRun,
    /// Pool state changed.
    CoreMutationApplied,
    /// Caller's ledger entries booked.
    LedgerUpdated,
    /// After-hook returned and its delta booked.
    AfterHookRun,
    /// Result returned to the caller.
    Settled,
}

impl fmt::Display for OperationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ValidityChecked => "validity_checked",
            Self::BeforeHookRun => "before_hook_run",
            Self::CoreMutationApplied => "core_mutation_applied",
            Self::LedgerUpdated => "ledger_updated",
            Self::AfterHookRun => "after_hook_run",
            Self::Settled => "settled",
        };
        f.write_str(name)
    }
}

/// Result of [`PoolManager::modify_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifyLiquidityOutcome {
    /// Net caller delta: principal plus fees, minus hook deltas.
    pub delta: BalanceDelta,
    /// Fees paid out to the position by this call. Already part of `delta`.
    pub fees_accrued: BalanceDelta,
}

impl PoolManager {
    /// Swaps against pool `key` and returns the caller's net delta.
    ///
    /// Negative components are owed by the caller, positive ones are owed
    /// to it. A price limit reached before the amount is filled yields a
    /// partial fill.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::InvalidSwapAmount`] for a zero amount.
    /// - [`FlashError::PoolNotInitialized`] for an unknown pool.
    /// - [`FlashError::InvalidPriceLimit`] for a limit on the wrong side.
    /// - [`FlashError::InvalidFeeOrSpacing`] for exact output in a pool
    ///   charging a 100% fee.
    /// - Policy errors and curve arithmetic errors.
    pub fn swap(
        &mut self,
        token: SessionToken,
        key: &PoolKey,
        params: SwapParams,
        hook_data: &[u8],
    ) -> Result<BalanceDelta> {
        self.lock().check(token)?;
        let sender = token.holder();
        if params.amount_specified() == 0 {
            return Err(FlashError::InvalidSwapAmount);
        }
        let id = key.id();
        let pool = self.pools().require(&id)?;
        pool.check_price_limit(&params)?;
        let hooks = pool.hooks();
        let max_steps = self.config().max_swap_steps();

        self.atomic("swap", Some(id), |manager, stage| {
            *stage = OperationStage::ValidityChecked;

            let before = manager.call_hook(hooks, HookPoint::BeforeSwap, |h, ctx| {
                h.before_swap(ctx, sender, key, &params, hook_data)
            })?;
            let requested =
                resolve_amount(HookPoint::BeforeSwap, params.amount_specified(), before)?;
            let before_delta = manager.account_hook_result(hooks, sender, key, before)?;
            let specified = before_delta.amount_for(params.specified_is_currency0());
            let amount_to_swap = requested
                .checked_add(specified)
                .ok_or(FlashError::Overflow("swap amount after hook"))?;
            if amount_to_swap != 0 && (amount_to_swap < 0) != (requested < 0) {
                return Err(FlashError::HookInvalidResponse {
                    point: HookPoint::BeforeSwap,
                    reason: "hook delta exceeds the requested amount",
                });
            }
            let swap_params = params.with_amount(amount_to_swap);
            *stage = OperationStage::BeforeHookRun;

            let swap_delta = if amount_to_swap == 0 {
                BalanceDelta::ZERO
            } else {
                if swap_params.swap_type() == SwapType::ExactOut && key.fee().is_total() {
                    return Err(FlashError::InvalidFeeOrSpacing(
                        "exact output is impossible at a 100% fee",
                    ));
                }
                manager.touch(id);
                let outcome = manager.pools_mut().require_mut(&id)?.swap(&swap_params, max_steps)?;
                manager.emit(Event::Swap {
                    id,
                    sender,
                    delta: outcome.delta,
                    sqrt_price: outcome.sqrt_price,
                    tick: outcome.tick,
                    liquidity: outcome.liquidity,
                    fee_pips: key.fee().pips(),
                });
                debug!(
                    pool = %id,
                    delta = %outcome.delta,
                    tick = outcome.tick,
                    steps = outcome.steps,
                    fee = outcome.fee_amount,
                    "swap applied"
                );
                outcome.delta
            };
            *stage = OperationStage::CoreMutationApplied;

            manager.account_delta(sender, key, swap_delta)?;
            *stage = OperationStage::LedgerUpdated;

            let after = manager.call_hook(hooks, HookPoint::AfterSwap, |h, ctx| {
                h.after_swap(ctx, sender, key, &swap_params, swap_delta, hook_data)
            })?;
            let after_delta = manager.account_hook_result(hooks, sender, key, after)?;
            *stage = OperationStage::AfterHookRun;

            let net = swap_delta.try_sub(before_delta)?.try_sub(after_delta)?;
            if amount_to_swap == 0 {
                // The policy filled the swap; report it at the unchanged price.
                let pool = manager.pools().require(&id)?;
                let event = Event::Swap {
                    id,
                    sender,
                    delta: net,
                    sqrt_price: pool.sqrt_price(),
                    tick: pool.tick(),
                    liquidity: pool.liquidity(),
                    fee_pips: key.fee().pips(),
                };
                manager.emit(event);
            }
            *stage = OperationStage::Settled;
            Ok(net)
        })
    }

    /// Adds liquidity to, removes liquidity from, or pokes a position of the
    /// session holder in pool `key`.
    ///
    /// Fees accrued by the position since its last modification are paid
    /// out in the same call, whatever the direction.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::PoolNotInitialized`] for an unknown pool.
    /// - [`FlashError::InvalidTickRange`] for an unordered, out-of-bounds or
    ///   misaligned range.
    /// - [`FlashError::InsufficientLiquidity`] when removing more than the
    ///   position holds; [`FlashError::PositionNotFound`] when poking an
    ///   empty position.
    /// - Policy errors and arithmetic errors.
    pub fn modify_liquidity(
        &mut self,
        token: SessionToken,
        key: &PoolKey,
        params: ModifyLiquidityParams,
        hook_data: &[u8],
    ) -> Result<ModifyLiquidityOutcome> {
        self.lock().check(token)?;
        let sender = token.holder();
        let id = key.id();
        let pool = self.pools().require(&id)?;
        pool.check_tick_range(params.tick_lower(), params.tick_upper())?;
        let hooks = pool.hooks();
        let adding = params.change_type() == ChangeType::Add;
        let (before_point, after_point) = if adding {
            (HookPoint::BeforeAddLiquidity, HookPoint::AfterAddLiquidity)
        } else {
            (HookPoint::BeforeRemoveLiquidity, HookPoint::AfterRemoveLiquidity)
        };

        self.atomic("modify_liquidity", Some(id), |manager, stage| {
            *stage = OperationStage::ValidityChecked;

            let before = manager.call_hook(hooks, before_point, |h, ctx| {
                if adding {
                    h.before_add_liquidity(ctx, sender, key, &params, hook_data)
                } else {
                    h.before_remove_liquidity(ctx, sender, key, &params, hook_data)
                }
            })?;
            let liquidity_delta = resolve_amount(before_point, params.liquidity_delta(), before)?;
            let params = params.with_liquidity_delta(liquidity_delta);
            let before_delta = manager.account_hook_result(hooks, sender, key, before)?;
            *stage = OperationStage::BeforeHookRun;

            manager.touch(id);
            let change = manager.pools_mut().require_mut(&id)?.modify_liquidity(sender, &params)?;
            let delta = change.principal.try_add(change.fees_accrued)?;
            manager.emit(Event::ModifyLiquidity {
                id,
                sender,
                tick_lower: params.tick_lower(),
                tick_upper: params.tick_upper(),
                liquidity_delta,
                salt: params.salt().as_bytes(),
                delta,
            });
            debug!(
                pool = %id,
                liquidity_delta,
                delta = %delta,
                fees = %change.fees_accrued,
                "liquidity modified"
            );
            *stage = OperationStage::CoreMutationApplied;

            manager.account_delta(sender, key, delta)?;
            *stage = OperationStage::LedgerUpdated;

            let fees_accrued = change.fees_accrued;
            let after = manager.call_hook(hooks, after_point, |h, ctx| {
                let fees = fees_accrued;
                if adding {
                    h.after_add_liquidity(ctx, sender, key, &params, delta, fees, hook_data)
                } else {
                    h.after_remove_liquidity(ctx, sender, key, &params, delta, fees, hook_data)
                }
            })?;
            let after_delta = manager.account_hook_result(hooks, sender, key, after)?;
            *stage = OperationStage::AfterHookRun;

            let net = delta.try_sub(before_delta)?.try_sub(after_delta)?;
            *stage = OperationStage::Settled;
            Ok(ModifyLiquidityOutcome {
                delta: net,
                fees_accrued,
            })
        })
    }

    /// Pays `amount0` and `amount1` straight to the liquidity in range at
    /// the current price of pool `key`.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::PoolNotInitialized`] for an unknown pool.
    /// - [`FlashError::NoLiquidityToReceiveFees`] when no liquidity is in
    ///   range.
    /// - Policy errors.
    pub fn donate(
        &mut self,
        token: SessionToken,
        key: &PoolKey,
        amount0: u128,
        amount1: u128,
        hook_data: &[u8],
    ) -> Result<BalanceDelta> {
        self.lock().check(token)?;
        let sender = token.holder();
        let id = key.id();
        let hooks = self.pools().require(&id)?.hooks();

        self.atomic("donate", Some(id), |manager, stage| {
            *stage = OperationStage::ValidityChecked;
            manager.call_hook(hooks, HookPoint::BeforeDonate, |h, ctx| {
                h.before_donate(ctx, sender, key, amount0, amount1, hook_data)
            })?;
            *stage = OperationStage::BeforeHookRun;

            manager.touch(id);
            let delta = manager.pools_mut().require_mut(&id)?.donate(amount0, amount1)?;
            manager.emit(Event::Donate {
                id,
                sender,
                amount0,
                amount1,
            });
            *stage = OperationStage::CoreMutationApplied;

            manager.account_delta(sender, key, delta)?;
            *stage = OperationStage::LedgerUpdated;

            manager.call_hook(hooks, HookPoint::AfterDonate, |h, ctx| {
                h.after_donate(ctx, sender, key, amount0, amount1, hook_data)
            })?;
            *stage = OperationStage::Settled;
            Ok(delta)
        })
    }
}
