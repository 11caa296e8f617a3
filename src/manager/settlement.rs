//! Settlement primitives: the calls that move ledger entries toward zero by
//! recording transfers in and out of custody.
//!
//! | Call | Ledger entry | Custody |
//! |------|--------------|---------|
//! | `settle(c, a)` | `-a` | reserves `+a` |
//! | `take(c, to, a)` | `+a` | reserves `-a`, `Transfer` event |
//! | `mint(to, c, a)` | `+a` | claims of `to` `+a` |
//! | `burn(c, a)` | `-a` | own claims `-a` |
//! | `clear(c, a)` | `+a` | none; the credit is forfeited |
//! | `sync(c, observed)` | none | checkpoint for the next `settle` |
//!
//! Every check runs before any state changes, so a failed primitive leaves
//! nothing behind.

use tracing::debug;

use super::events::Event;
use super::pool_manager::PoolManager;
use super::session::SessionToken;
use crate::domain::{Address, Currency};
use crate::error::{FlashError, Result};

fn signed(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| FlashError::DeltaOverflow)
}

impl PoolManager {
    /// Records that `amount` of `currency` was paid in by the session
    /// holder, reducing what it owes. Returns the amount credited.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::OverSettlement`] if `amount` exceeds what is owed.
    /// - [`FlashError::UnpaidSettlement`] if a `sync` checkpoint for
    ///   `currency` shows less than `amount` arriving.
    pub fn settle(
        &mut self,
        token: SessionToken,
        currency: Currency,
        amount: u128,
    ) -> Result<u128> {
        self.lock().check(token)?;
        self.settle_for(token.holder(), currency, amount)
    }

    /// Pays `amount` of `currency` out of custody to `recipient`, booking it
    /// against the session holder. The entry may go positive, which is a
    /// flash loan that must be repaid before the session closes.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::InsufficientReserves`] if custody holds less.
    pub fn take(
        &mut self,
        token: SessionToken,
        currency: Currency,
        recipient: Address,
        amount: u128,
    ) -> Result<()> {
        self.lock().check(token)?;
        self.take_for(token.holder(), currency, recipient, amount)
    }

    /// Records the externally observed custody balance of `currency`. The
    /// next `settle` of `currency` may credit at most the increase over the
    /// reserves held at this call. The checkpoint does not outlive the
    /// session.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::ReserveShortfall`] if `observed` is below the
    ///   tracked reserves.
    pub fn sync(&mut self, token: SessionToken, currency: Currency, observed: u128) -> Result<()> {
        self.lock().check(token)?;
        self.sync_for(currency, observed)
    }

    /// Mints `amount` of claims on `currency` to `recipient`; the session
    /// holder owes the underlying.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::DeltaOverflow`] or [`FlashError::Overflow`] if a
    ///   balance leaves its range.
    pub fn mint(
        &mut self,
        token: SessionToken,
        recipient: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        self.lock().check(token)?;
        self.mint_for(token.holder(), recipient, currency, amount)
    }

    /// Burns `amount` of the session holder's claims on `currency`,
    /// crediting the holder.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::InsufficientClaimBalance`] if the holder has fewer
    ///   claims.
    pub fn burn(&mut self, token: SessionToken, currency: Currency, amount: u128) -> Result<()> {
        self.lock().check(token)?;
        self.burn_for(token.holder(), currency, amount)
    }

    /// Forfeits a credit of exactly `amount` in `currency`. The value stays
    /// in custody.
    ///
    /// # Errors
    ///
    /// - [`FlashError::ManagerLocked`] for a stale token.
    /// - [`FlashError::MustClearExactCredit`] unless the holder's entry is
    ///   exactly `-amount`.
    pub fn clear(&mut self, token: SessionToken, currency: Currency, amount: u128) -> Result<()> {
        self.lock().check(token)?;
        self.clear_for(token.holder(), currency, amount)
    }

    // -- identity-bound implementations ----------------------------------------

    pub(crate) fn settle_for(
        &mut self,
        identity: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<u128> {
        self.lock().require_open()?;
        if amount == 0 {
            return Ok(0);
        }
        let owed = self.net_delta(identity, currency);
        let credit = signed(amount)?;
        if credit > owed {
            return Err(FlashError::OverSettlement {
                currency,
                owed,
                amount,
            });
        }
        self.custody().check_paid(currency, amount)?;
        self.reserves_mut().deposit(currency, amount)?;
        self.ledger_mut().apply(identity, currency, -credit)?;
        debug!(identity = %identity, currency = %currency, amount, "settled");
        Ok(amount)
    }

    pub(crate) fn take_for(
        &mut self,
        identity: Address,
        currency: Currency,
        recipient: Address,
        amount: u128,
    ) -> Result<()> {
        self.lock().require_open()?;
        let debit = signed(amount)?;
        if self.reserves(currency) < amount {
            return Err(FlashError::InsufficientReserves(currency));
        }
        self.ledger_mut().apply(identity, currency, debit)?;
        self.reserves_mut().withdraw(currency, amount)?;
        self.emit(Event::Transfer {
            currency,
            sender: identity,
            recipient,
            amount,
        });
        debug!(
            identity = %identity,
            currency = %currency,
            recipient = %recipient,
            amount,
            "taken"
        );
        Ok(())
    }

    pub(crate) fn sync_for(&mut self, currency: Currency, observed: u128) -> Result<()> {
        self.lock().require_open()?;
        self.reserves_mut().sync(currency, observed)?;
        debug!(currency = %currency, observed, "synced");
        Ok(())
    }

    pub(crate) fn mint_for(
        &mut self,
        identity: Address,
        recipient: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        self.lock().require_open()?;
        let debit = signed(amount)?;
        self.net_delta(identity, currency)
            .checked_add(debit)
            .ok_or(FlashError::DeltaOverflow)?;
        self.claim_balance(recipient, currency)
            .checked_add(amount)
            .ok_or(FlashError::Overflow("claim balance exceeds u128"))?;
        self.ledger_mut().apply(identity, currency, debit)?;
        self.reserves_mut().mint_claim(recipient, currency, amount)?;
        debug!(
            identity = %identity,
            currency = %currency,
            recipient = %recipient,
            amount,
            "minted"
        );
        Ok(())
    }

    pub(crate) fn burn_for(
        &mut self,
        identity: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        self.lock().require_open()?;
        let credit = signed(amount)?;
        if self.claim_balance(identity, currency) < amount {
            return Err(FlashError::InsufficientClaimBalance);
        }
        self.net_delta(identity, currency)
            .checked_sub(credit)
            .ok_or(FlashError::DeltaOverflow)?;
        self.reserves_mut().burn_claim(identity, currency, amount)?;
        self.ledger_mut().apply(identity, currency, -credit)?;
        debug!(identity = %identity, currency = %currency, amount, "burned");
        Ok(())
    }

    pub(crate) fn clear_for(
        &mut self,
        identity: Address,
        currency: Currency,
        amount: u128,
    ) -> Result<()> {
        self.lock().require_open()?;
        let credit = signed(amount)?;
        if self.net_delta(identity, currency) != -credit {
            return Err(FlashError::MustClearExactCredit);
        }
        self.ledger_mut().apply(identity, currency, credit)?;
        debug!(identity = %identity, currency = %currency, amount, "cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn holder() -> Address {
        Address::from_low_byte(0x01)
    }

    fn usd() -> Currency {
        Currency::Token(Address::from_low_byte(0x0D))
    }

    #[test]
    fn primitives_need_a_session() {
        let mut manager = PoolManager::default();
        assert_eq!(
            manager.settle_for(holder(), usd(), 1),
            Err(FlashError::ManagerLocked)
        );
        assert_eq!(manager.sync_for(usd(), 1), Err(FlashError::ManagerLocked));
    }

    #[test]
    fn stale_token_is_refused() {
        let mut manager = PoolManager::default();
        let Ok(token) = manager.open(holder(), |_, token| Ok(token)) else {
            panic!("empty session settles");
        };
        assert_eq!(manager.settle(token, usd(), 1), Err(FlashError::ManagerLocked));
    }

    #[test]
    fn mint_then_settle_then_burn() {
        let mut manager = PoolManager::default();
        let result = manager.open(holder(), |m, token| {
            m.mint(token, holder(), usd(), 500)?;
            assert_eq!(m.net_delta(holder(), usd()), 500);
            m.settle(token, usd(), 500)?;
            assert_eq!(m.net_delta(holder(), usd()), 0);
            Ok(())
        });
        assert_eq!(result, Ok(()));
        assert_eq!(manager.claim_balance(holder(), usd()), 500);
        assert_eq!(manager.reserves(usd()), 500);

        let result = manager.open(holder(), |m, token| {
            m.burn(token, usd(), 200)?;
            assert_eq!(m.net_delta(holder(), usd()), -200);
            m.take(token, usd(), holder(), 200)
        });
        assert_eq!(result, Ok(()));
        assert_eq!(manager.claim_balance(holder(), usd()), 300);
        assert_eq!(manager.reserves(usd()), 300);
    }

    #[test]
    fn settle_rejects_overpayment() {
        let mut manager = PoolManager::default();
        let result = manager.open(holder(), |m, token| {
            m.mint(token, holder(), usd(), 100)?;
            m.settle(token, usd(), 101)
        });
        assert_eq!(
            result,
            Err(FlashError::OverSettlement {
                currency: usd(),
                owed: 100,
                amount: 101,
            })
        );
        assert_eq!(manager.claim_balance(holder(), usd()), 0);
    }

    #[test]
    fn take_beyond_reserves_fails() {
        let mut manager = PoolManager::default();
        let result = manager.open(holder(), |m, token| m.take(token, usd(), holder(), 1));
        assert_eq!(result, Err(FlashError::InsufficientReserves(usd())));
        assert!(manager.events().is_empty());
    }

    #[test]
    fn clear_requires_exact_credit() {
        let mut manager = PoolManager::default();
        let seeded = manager.open(holder(), |m, token| {
            m.mint(token, holder(), usd(), 50)?;
            m.settle(token, usd(), 50).map(|_| ())
        });
        assert_eq!(seeded, Ok(()));
        let result = manager.open(holder(), |m, token| {
            m.burn(token, usd(), 50)?;
            assert_eq!(m.clear(token, usd(), 49), Err(FlashError::MustClearExactCredit));
            m.clear(token, usd(), 50)
        });
        assert_eq!(result, Ok(()));
        assert_eq!(manager.reserves(usd()), 50);
        assert_eq!(manager.claim_balance(holder(), usd()), 0);
    }
}
