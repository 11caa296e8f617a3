//! Invocation of a pool's policy at one lifecycle point.
//!
//! 1. If the pool has no policy, or its cached flags do not enable the
//!    point, nothing is called and the result is [`HookResult::NoOp`].
//! 2. Otherwise the policy is resolved from the registry and invoked with a
//!    [`HookContext`] bound to the policy's own address.
//! 3. The returned value is checked against the flags: a delta or modified
//!    amount needs the point's returns-delta flag, and a modified amount is
//!    only accepted before swaps and liquidity changes.
//!
//! Booking the accepted delta is left to the operation, which knows the
//! caller and the pool's currencies.

use tracing::trace;

use super::context::HookContext;
use super::flags::{HookConfig, HookPoint};
use super::result::HookResult;
use crate::error::{FlashError, Result};
use crate::manager::PoolManager;
use crate::traits::Hooks;

impl PoolManager {
    /// Calls the policy described by `config` at `point` through `invoke`.
    ///
    /// # Errors
    ///
    /// - [`FlashError::HookNotRegistered`] if the policy is gone from the
    ///   registry.
    /// - [`FlashError::HookDeltaNotAuthorized`] or
    ///   [`FlashError::HookInvalidResponse`] for a result the flags do not
    ///   allow.
    /// - Any error returned by the policy.
    pub(crate) fn call_hook<F>(
        &mut self,
        config: Option<HookConfig>,
        point: HookPoint,
        invoke: F,
    ) -> Result<HookResult>
    where
        F: FnOnce(&dyn Hooks, &mut HookContext<'_>) -> Result<HookResult>,
    {
        let Some(config) = config.filter(|c| c.is_enabled(point)) else {
            return Ok(HookResult::NoOp);
        };
        let hooks = self
            .registry()
            .get(&config.address())
            .ok_or(FlashError::HookNotRegistered)?;
        trace!(hook = %config.address(), %point, "invoking hook");

        // A running policy may not open a session, even when none is open.
        self.enter_hook();
        let outcome = {
            let mut ctx = HookContext::new(self, config.address());
            invoke(hooks.as_ref(), &mut ctx)
        };
        self.leave_hook();
        let result = outcome?;
        check_result(config, point, result)?;

        trace!(hook = %config.address(), %point, ?result, "hook returned");
        Ok(result)
    }
}

/// Checks a policy's answer against what its flags allow at `point`.
///
/// # Errors
///
/// - [`FlashError::HookInvalidResponse`] for a modified amount where none is
///   accepted.
/// - [`FlashError::HookDeltaNotAuthorized`] for a delta or modified amount
///   without the returns-delta flag.
pub(crate) fn check_result(config: HookConfig, point: HookPoint, result: HookResult) -> Result<()> {
    match result {
        HookResult::NoOp => Ok(()),
        HookResult::ModifiedAmount(_) if !point.accepts_modified_amount() => {
            Err(FlashError::HookInvalidResponse {
                point,
                reason: "a modified amount is not accepted here",
            })
        }
        HookResult::Delta(_) | HookResult::ModifiedAmount(_) => {
            if config.may_return_delta(point) {
                Ok(())
            } else {
                Err(FlashError::HookDeltaNotAuthorized(point))
            }
        }
    }
}

/// Applies a policy's replacement for the `requested` amount.
///
/// The replacement must be non-zero and keep the sign of the request; a
/// zero request (a poke) accepts no replacement.
///
/// # Errors
///
/// Returns [`FlashError::HookInvalidResponse`] for a zero or sign-flipped
/// replacement.
pub(crate) fn resolve_amount(
    point: HookPoint,
    requested: i128,
    result: HookResult,
) -> Result<i128> {
    let HookResult::ModifiedAmount(amount) = result else {
        return Ok(requested);
    };
    if amount == 0 || requested == 0 || (amount < 0) != (requested < 0) {
        return Err(FlashError::HookInvalidResponse {
            point,
            reason: "modified amount must be non-zero and keep the requested sign",
        });
    }
    Ok(amount)
}
