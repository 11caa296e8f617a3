//! The singleton manager: pool store, session lock and ledger.
//!
//! # Sessions
//!
//! [`PoolManager::open`] is the only way into mutating operations. It takes
//! the lock, hands the callback a [`SessionToken`], and on return checks
//! that every ledger entry is back at zero. If the callback fails or the
//! check does, every pool, reserve, claim and event change made during the
//! session is undone. The lock is released on every path.
//!
//! # Operations
//!
//! Each operation runs inside [`PoolManager::atomic`], which records the
//! target pool, the ledger and custody balances before anything is touched
//! and puts them back if the operation fails. A failed operation does not
//! close the session; the callback may handle the error and carry on.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::events::Event;
use super::ledger::CurrencyLedger;
use super::operations::OperationStage;
use super::reserves::Reserves;
use super::session::{Checkpoint, Journal, LockStatus, Session, SessionToken};
use crate::config::ManagerConfig;
use crate::domain::{
    Address, BalanceDelta, Currency, PoolId, PoolKey, PositionKey, Salt, SqrtPrice,
};
use crate::error::{FlashError, Result};
use crate::hooks::{HookConfig, HookPoint, HookRegistry, HookResult};
use crate::pools::{PoolState, PoolStore, PositionState};
use crate::traits::Hooks;

/// Hosts every pool and settles all of them through one ledger.
///
/// # Examples
///
/// ```
/// use hydra_flash::prelude::*;
///
/// let mut manager = PoolManager::default();
/// let key = PoolKey::new(
///     Currency::Native,
///     Currency::Token(Address::from_low_byte(1)),
///     FeeTier::MEDIUM,
///     60,
///     Address::ZERO,
/// )
/// .expect("distinct currencies");
/// let id = manager
///     .initialize(Address::from_low_byte(9), key, SqrtPrice::ONE)
///     .expect("new pool");
/// assert_eq!(manager.pool(&id).map(PoolState::tick), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct PoolManager {
    config: ManagerConfig,
    pools: PoolStore,
    hooks: HookRegistry,
    ledger: CurrencyLedger,
    reserves: Reserves,
    lock: LockStatus,
    next_session: u64,
    events: Vec<Event>,
    hook_depth: u32,
}

impl PoolManager {
    /// Creates an empty manager enforcing `config`.
    #[must_use]
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Limits in force.
    #[must_use]
    pub const fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Registers a policy under `address`.
    ///
    /// Pools capture a policy's flags when they are initialized, so pools
    /// created before a replacement keep the old flags.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidHookFlags`] for the zero address or
    /// inconsistent flags.
    pub fn register_hooks(
        &mut self,
        address: Address,
        hooks: Arc<dyn Hooks>,
    ) -> Result<Option<Arc<dyn Hooks>>> {
        let replaced = self.hooks.register(address, hooks)?;
        debug!(hook = %address, replaced = replaced.is_some(), "hooks registered");
        Ok(replaced)
    }

    /// Creates a pool for `key` at `sqrt_price` and returns its id.
    ///
    /// Does not need a session. Inside one, the new pool is removed again
    /// if the session fails.
    ///
    /// # Errors
    ///
    /// - [`FlashError::InvalidFeeOrSpacing`] for a fee or tick spacing
    ///   outside the configured limits.
    /// - [`FlashError::HookNotRegistered`] if the key names an unknown
    ///   policy; [`FlashError::InvalidHookFlags`] if its flags are
    ///   inconsistent.
    /// - [`FlashError::PoolAlreadyInitialized`] if the id exists.
    /// - [`FlashError::InvalidPrice`] for the maximum sqrt price.
    /// - Any error raised by the initialize hooks.
    pub fn initialize(
        &mut self,
        sender: Address,
        key: PoolKey,
        sqrt_price: SqrtPrice,
    ) -> Result<PoolId> {
        let fee = key.fee();
        if !fee.is_valid() || fee.pips() > self.config.max_lp_fee() {
            return Err(FlashError::InvalidFeeOrSpacing("fee above the maximum LP fee"));
        }
        let spacing = key.tick_spacing();
        if spacing < self.config.min_tick_spacing() {
            return Err(FlashError::InvalidFeeOrSpacing("tick spacing below the minimum"));
        }
        if spacing > self.config.max_tick_spacing() {
            return Err(FlashError::InvalidFeeOrSpacing("tick spacing above the maximum"));
        }
        let hook_config = self.resolve_hooks(key.hooks())?;
        let id = key.id();
        if self.pools.contains(&id) {
            return Err(FlashError::PoolAlreadyInitialized);
        }
        let pool = PoolState::new(key, sqrt_price, hook_config)?;
        let tick = pool.tick();

        self.atomic("initialize", Some(id), |manager, stage| {
            *stage = OperationStage::ValidityChecked;
            manager.call_hook(hook_config, HookPoint::BeforeInitialize, |hooks, ctx| {
                hooks.before_initialize(ctx, sender, &key, sqrt_price)
            })?;
            *stage = OperationStage::BeforeHookRun;

            manager.touch(id);
            manager.pools.insert(pool)?;
            *stage = OperationStage::CoreMutationApplied;
            manager.emit(Event::PoolInitialized {
                id,
                key,
                sqrt_price,
                tick,
            });

            manager.call_hook(hook_config, HookPoint::AfterInitialize, |hooks, ctx| {
                hooks.after_initialize(ctx, sender, &key, sqrt_price, tick)
            })?;
            *stage = OperationStage::AfterHookRun;
            Ok(())
        })?;

        info!(pool = %id, tick, fee = fee.pips(), spacing, "pool initialized");
        Ok(id)
    }

    /// Opens a session for `holder`, runs `f` and settles.
    ///
    /// `f` receives the manager and the session token that authorizes
    /// mutating calls. When `f` returns `Ok`, every ledger entry must be
    /// zero.
    ///
    /// # Errors
    ///
    /// - [`FlashError::AlreadyLocked`] if a session is already open or a
    ///   policy is running. No state changes.
    /// - [`FlashError::CurrencyNotSettled`] naming the first outstanding
    ///   entry when `f` leaves balances open.
    /// - Any error returned by `f`.
    ///
    /// On error, every change made during the session is undone.
    pub fn open<T, F>(&mut self, holder: Address, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self, SessionToken) -> Result<T>,
    {
        if self.hook_depth > 0 {
            return Err(FlashError::AlreadyLocked);
        }
        let token = SessionToken::new(self.next_session, holder);
        self.lock.acquire(Session {
            token,
            journal: Journal::default(),
            reserves: self.reserves.clone(),
            events: self.events.len(),
        })?;
        self.next_session = self.next_session.wrapping_add(1);
        info!(session = token.id(), holder = %holder, "session opened");

        let outcome = f(self, token).and_then(|value| self.check_solvency().map(|()| value));
        let session = self.lock.release();
        self.reserves.clear_sync();

        match outcome {
            Ok(value) => {
                info!(session = token.id(), "session settled");
                Ok(value)
            }
            Err(error) => {
                if let Some(session) = session {
                    self.rollback_session(session);
                }
                warn!(session = token.id(), error = %error, "session rolled back");
                Err(error)
            }
        }
    }

    /// Returns `true` while a session is open.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Pool `id`, if initialized.
    #[must_use]
    pub fn pool(&self, id: &PoolId) -> Option<&PoolState> {
        self.pools.get(id)
    }

    /// Every pool.
    #[must_use]
    pub const fn pools(&self) -> &PoolStore {
        &self.pools
    }

    /// Position of `owner` over `[tick_lower, tick_upper)` with `salt` in
    /// pool `id`.
    #[must_use]
    pub fn position(
        &self,
        id: &PoolId,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        salt: Salt,
    ) -> Option<&PositionState> {
        let key = PositionKey::new(owner, tick_lower, tick_upper, salt);
        self.pools.get(id).and_then(|pool| pool.position(&key))
    }

    /// Ledger entry of `identity` in `currency`: positive is owed to the
    /// manager, negative is owed to `identity`.
    #[must_use]
    pub fn net_delta(&self, identity: Address, currency: Currency) -> i128 {
        self.ledger.net(identity, currency)
    }

    /// The whole ledger of the open session.
    #[must_use]
    pub const fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    /// Amount of `currency` held in custody.
    #[must_use]
    pub fn reserves(&self, currency: Currency) -> u128 {
        self.reserves.held(currency)
    }

    /// Claims on `currency` held by `owner`.
    #[must_use]
    pub fn claim_balance(&self, owner: Address, currency: Currency) -> u128 {
        self.reserves.claim(owner, currency)
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Takes every buffered event, oldest first.
    ///
    /// Inside a session, events emitted before the drain can no longer be
    /// discarded by a rollback.
    pub fn drain_events(&mut self) -> Vec<Event> {
        if let LockStatus::Locked(session) = &mut self.lock {
            session.events = 0;
        }
        core::mem::take(&mut self.events)
    }

    // -- crate internals ------------------------------------------------------

    pub(crate) const fn registry(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Marks a policy as running until the matching [`Self::leave_hook`].
    pub(crate) fn enter_hook(&mut self) {
        self.hook_depth = self.hook_depth.saturating_add(1);
    }

    pub(crate) fn leave_hook(&mut self) {
        self.hook_depth = self.hook_depth.saturating_sub(1);
    }

    pub(crate) fn lock(&self) -> &LockStatus {
        &self.lock
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut CurrencyLedger {
        &mut self.ledger
    }

    pub(crate) fn reserves_mut(&mut self) -> &mut Reserves {
        &mut self.reserves
    }

    pub(crate) fn custody(&self) -> &Reserves {
        &self.reserves
    }

    pub(crate) fn pools_mut(&mut self) -> &mut PoolStore {
        &mut self.pools
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Journals pool `id` before its first change in the open session.
    pub(crate) fn touch(&mut self, id: PoolId) {
        let pools = &self.pools;
        self.lock.journal(id, || pools.get(&id).cloned());
    }

    /// Books a caller-centric `delta` on `key`'s currencies to `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::DeltaOverflow`] if an entry leaves `i128`.
    pub(crate) fn account_delta(
        &mut self,
        identity: Address,
        key: &PoolKey,
        delta: BalanceDelta,
    ) -> Result<()> {
        let owed0 = delta.amount0().checked_neg().ok_or(FlashError::DeltaOverflow)?;
        let owed1 = delta.amount1().checked_neg().ok_or(FlashError::DeltaOverflow)?;
        self.ledger.apply(identity, key.currency0(), owed0)?;
        self.ledger.apply(identity, key.currency1(), owed1)?;
        Ok(())
    }

    /// Books a policy's delta to its own identity and the opposite amount
    /// to `caller`, so the caller's result shrinks by exactly `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::DeltaOverflow`] if an entry leaves `i128`.
    pub(crate) fn account_hook_result(
        &mut self,
        config: Option<HookConfig>,
        caller: Address,
        key: &PoolKey,
        result: HookResult,
    ) -> Result<BalanceDelta> {
        let delta = result.delta();
        let Some(config) = config.filter(|_| !delta.is_zero()) else {
            return Ok(BalanceDelta::ZERO);
        };
        self.account_delta(config.address(), key, delta)?;
        let reverse = delta.checked_neg().ok_or(FlashError::DeltaOverflow)?;
        self.account_delta(caller, key, reverse)?;
        debug!(hook = %config.address(), delta = %delta, "hook delta booked");
        Ok(delta)
    }

    /// Runs `f` as one atomic operation on pool `pool`.
    ///
    /// `f` advances `stage` as it goes; on failure everything is restored
    /// and the stage reached is logged.
    pub(crate) fn atomic<T, F>(
        &mut self,
        operation: &'static str,
        pool: Option<PoolId>,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut Self, &mut OperationStage) -> Result<T>,
    {
        let checkpoint = self.checkpoint(pool);
        let mut stage = OperationStage::Idle;
        match f(self, &mut stage) {
            Ok(value) => {
                debug!(operation, ?stage, "operation applied");
                Ok(value)
            }
            Err(error) => {
                self.restore(checkpoint);
                warn!(operation, ?stage, error = %error, "operation rolled back");
                Err(error)
            }
        }
    }

    fn checkpoint(&self, pool: Option<PoolId>) -> Checkpoint {
        Checkpoint {
            pool: pool.map(|id| (id, self.pools.get(&id).cloned())),
            ledger: self.ledger.clone(),
            reserves: self.reserves.clone(),
            events: self.events.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        if let Some((id, saved)) = checkpoint.pool {
            self.pools.restore(id, saved);
        }
        self.ledger = checkpoint.ledger;
        self.reserves = checkpoint.reserves;
        self.events.truncate(checkpoint.events);
    }

    fn resolve_hooks(&self, address: Address) -> Result<Option<HookConfig>> {
        if address.is_zero() {
            return Ok(None);
        }
        let hooks = self.hooks.get(&address).ok_or(FlashError::HookNotRegistered)?;
        let flags = hooks.flags();
        flags.validate()?;
        Ok(Some(HookConfig::new(address, flags)))
    }

    fn check_solvency(&self) -> Result<()> {
        match self.ledger.first_nonzero() {
            None => Ok(()),
            Some((identity, currency, amount)) => {
                debug!(
                    identity = %identity,
                    currency = %currency,
                    amount,
                    outstanding = self.ledger.nonzero_count(),
                    "session left balances open"
                );
                Err(FlashError::CurrencyNotSettled { currency, amount })
            }
        }
    }

    fn rollback_session(&mut self, session: Session) {
        for (id, original) in session.journal.into_originals() {
            self.pools.restore(id, original);
        }
        self.ledger.clear();
        self.reserves = session.reserves;
        self.reserves.clear_sync();
        self.events.truncate(session.events);
    }
}
