//! Handle given to a policy while it is being invoked.

use crate::domain::{Address, Currency, PoolId};
use crate::error::Result;
use crate::manager::{PoolManager, SessionToken};
use crate::pools::PoolState;

/// The manager as seen by a policy.
///
/// Every balance-changing call is booked under the policy's own address,
/// so a policy can settle what it owes or take what it is owed but can
/// never move another identity's entries. Balance calls need an open
/// session and fail with
/// [`FlashError::ManagerLocked`](crate::error::FlashError::ManagerLocked)
/// when the policy runs outside one (at `initialize` called without a
/// session).
pub struct HookContext<'a> {
    manager: &'a mut PoolManager,
    identity: Address,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(manager: &'a mut PoolManager, identity: Address) -> Self {
        Self { manager, identity }
    }

    /// Ledger identity of the policy: its registered address.
    #[must_use]
    pub const fn identity(&self) -> Address {
        self.identity
    }

    /// Read-only view of the manager.
    #[must_use]
    pub fn manager(&self) -> &PoolManager {
        &*self.manager
    }

    /// Pool `id`, if initialized.
    #[must_use]
    pub fn pool(&self, id: &PoolId) -> Option<&PoolState> {
        self.manager.pool(id)
    }

    /// The policy's own ledger entry in `currency`.
    #[must_use]
    pub fn net_delta(&self, currency: Currency) -> i128 {
        self.manager.net_delta(self.identity, currency)
    }

    /// Pays `amount` of `currency` toward what the policy owes.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::settle`].
    pub fn settle(&mut self, currency: Currency, amount: u128) -> Result<u128> {
        self.manager.settle_for(self.identity, currency, amount)
    }

    /// Takes `amount` of `currency` out of custody to `recipient`.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::take`].
    pub fn take(&mut self, currency: Currency, recipient: Address, amount: u128) -> Result<()> {
        self.manager.take_for(self.identity, currency, recipient, amount)
    }

    /// Records the observed custody balance of `currency`.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::sync`].
    pub fn sync(&mut self, currency: Currency, observed: u128) -> Result<()> {
        self.manager.sync_for(currency, observed)
    }

    /// Mints claims on `currency` to `recipient`, booking the debt to the
    /// policy.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::mint`].
    pub fn mint(&mut self, recipient: Address, currency: Currency, amount: u128) -> Result<()> {
        self.manager.mint_for(self.identity, recipient, currency, amount)
    }

    /// Burns the policy's own claims on `currency`.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::burn`].
    pub fn burn(&mut self, currency: Currency, amount: u128) -> Result<()> {
        self.manager.burn_for(self.identity, currency, amount)
    }

    /// Forfeits exactly `amount` of credit in `currency`.
    ///
    /// # Errors
    ///
    /// See [`PoolManager::clear`].
    pub fn clear(&mut self, currency: Currency, amount: u128) -> Result<()> {
        self.manager.clear_for(self.identity, currency, amount)
    }

    /// Tries to open a nested session as the policy.
    ///
    /// The manager refuses new sessions while a policy runs, including
    /// policies invoked by `initialize` outside a session, so this always
    /// fails with
    /// [`FlashError::AlreadyLocked`](crate::error::FlashError::AlreadyLocked).
    ///
    /// # Errors
    ///
    /// See [`PoolManager::open`].
    pub fn open<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PoolManager, SessionToken) -> Result<T>,
    {
        self.manager.open(self.identity, f)
    }
}
