//! Custody bookkeeping: reserves held per currency, the pending balance
//! checkpoint taken by `sync`, and claim balances held inside the manager.

use std::collections::HashMap;

use crate::domain::{Address, Currency};
use crate::error::{FlashError, Result};

/// Balance checkpoint taken by `sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncPoint {
    currency: Currency,
    held: u128,
    observed: u128,
}

/// Balances the manager holds on behalf of everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Reserves {
    held: HashMap<Currency, u128>,
    synced: Option<SyncPoint>,
    claims: HashMap<(Address, Currency), u128>,
}

impl Reserves {
    pub(crate) fn held(&self, currency: Currency) -> u128 {
        self.held.get(&currency).copied().unwrap_or(0)
    }

    pub(crate) fn claim(&self, owner: Address, currency: Currency) -> u128 {
        self.claims.get(&(owner, currency)).copied().unwrap_or(0)
    }

    /// Records the externally observed balance of `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ReserveShortfall`] if `observed` is below what
    /// the manager already holds.
    pub(crate) fn sync(&mut self, currency: Currency, observed: u128) -> Result<()> {
        let held = self.held(currency);
        if observed < held {
            return Err(FlashError::ReserveShortfall);
        }
        self.synced = Some(SyncPoint {
            currency,
            held,
            observed,
        });
        Ok(())
    }

    /// Drops any pending checkpoint.
    pub(crate) fn clear_sync(&mut self) {
        self.synced = None;
    }

    /// Checks that a settlement of `amount` is covered by what arrived
    /// between the reserves recorded at the last `sync` of `currency` and
    /// the balance observed then. Later withdrawals do not widen the bound.
    /// Without a checkpoint for `currency` the transfer is trusted.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::UnpaidSettlement`] when the observed increase
    /// is smaller than `amount`.
    pub(crate) fn check_paid(&self, currency: Currency, amount: u128) -> Result<()> {
        match self.synced {
            Some(point) if point.currency == currency => {
                let paid = point.observed.saturating_sub(point.held);
                if amount > paid {
                    return Err(FlashError::UnpaidSettlement);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Adds `amount` to the reserves of `currency` and consumes any sync
    /// checkpoint for it.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Overflow`] if the reserves leave `u128`.
    pub(crate) fn deposit(&mut self, currency: Currency, amount: u128) -> Result<()> {
        let next = self
            .held(currency)
            .checked_add(amount)
            .ok_or(FlashError::Overflow("reserves exceed u128"))?;
        self.held.insert(currency, next);
        if self.synced.is_some_and(|point| point.currency == currency) {
            self.synced = None;
        }
        Ok(())
    }

    /// Removes `amount` from the reserves of `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InsufficientReserves`] if less is held.
    pub(crate) fn withdraw(&mut self, currency: Currency, amount: u128) -> Result<()> {
        let next = self
            .held(currency)
            .checked_sub(amount)
            .ok_or(FlashError::InsufficientReserves(currency))?;
        self.held.insert(currency, next);
        Ok(())
    }

    /// Credits `amount` of claims on `currency` to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::Overflow`] if the balance leaves `u128`.
    pub(crate) fn mint_claim(
        &mut self,
        owner: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        let next = self
            .claim(owner, currency)
            .checked_add(amount)
            .ok_or(FlashError::Overflow("claim balance exceeds u128"))?;
        self.claims.insert((owner, currency), next);
        Ok(())
    }

    /// Debits `amount` of claims on `currency` from `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InsufficientClaimBalance`] if `owner` holds
    /// less.
    pub(crate) fn burn_claim(
        &mut self,
        owner: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        let next = self
            .claim(owner, currency)
            .checked_sub(amount)
            .ok_or(FlashError::InsufficientClaimBalance)?;
        if next == 0 {
            self.claims.remove(&(owner, currency));
        } else {
            self.claims.insert((owner, currency), next);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Currency {
        Currency::Token(Address::from_low_byte(4))
    }

    #[test]
    fn deposit_and_withdraw() {
        let mut reserves = Reserves::default();
        assert_eq!(reserves.deposit(token(), 100), Ok(()));
        assert_eq!(reserves.withdraw(token(), 60), Ok(()));
        assert_eq!(reserves.held(token()), 40);
        assert_eq!(
            reserves.withdraw(token(), 41),
            Err(FlashError::InsufficientReserves(token()))
        );
        assert_eq!(reserves.held(token()), 40);
    }

    #[test]
    fn sync_bounds_the_next_settlement() {
        let mut reserves = Reserves::default();
        let _ = reserves.deposit(token(), 100);
        assert_eq!(reserves.sync(token(), 99), Err(FlashError::ReserveShortfall));
        assert_eq!(reserves.sync(token(), 150), Ok(()));
        assert_eq!(reserves.check_paid(token(), 51), Err(FlashError::UnpaidSettlement));
        assert_eq!(reserves.check_paid(token(), 50), Ok(()));
        assert_eq!(reserves.check_paid(Currency::Native, 1_000), Ok(()));
        let _ = reserves.deposit(token(), 50);
        // The checkpoint is consumed by the deposit.
        assert_eq!(reserves.check_paid(token(), 1_000), Ok(()));
    }

    #[test]
    fn withdrawal_after_sync_does_not_widen_the_bound() {
        let mut reserves = Reserves::default();
        let _ = reserves.deposit(token(), 1_000);
        assert_eq!(reserves.sync(token(), 1_000), Ok(()));
        assert_eq!(reserves.withdraw(token(), 500), Ok(()));
        assert_eq!(reserves.check_paid(token(), 500), Err(FlashError::UnpaidSettlement));
        assert_eq!(reserves.check_paid(token(), 0), Ok(()));
    }

    #[test]
    fn clear_sync_drops_the_checkpoint() {
        let mut reserves = Reserves::default();
        assert_eq!(reserves.sync(token(), 10), Ok(()));
        assert_eq!(reserves.check_paid(token(), 11), Err(FlashError::UnpaidSettlement));
        reserves.clear_sync();
        assert_eq!(reserves.check_paid(token(), 11), Ok(()));
    }

    #[test]
    fn claims_mint_and_burn() {
        let mut reserves = Reserves::default();
        let owner = Address::from_low_byte(1);
        assert_eq!(reserves.mint_claim(owner, token(), 30), Ok(()));
        assert_eq!(
            reserves.burn_claim(owner, token(), 31),
            Err(FlashError::InsufficientClaimBalance)
        );
        assert_eq!(reserves.burn_claim(owner, token(), 30), Ok(()));
        assert_eq!(reserves.claim(owner, token()), 0);
    }
}
