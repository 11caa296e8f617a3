//! Per-identity, per-currency running balances of one session.
//!
//! Entries are signed: positive is owed to the manager (the identity must
//! pay in), negative is owed to the identity (the manager must pay out).
//! Entries are created on first touch and removed as soon as they return
//! to zero, so an empty ledger means every identity is settled.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Address, Currency};
use crate::error::{FlashError, Result};

/// The flash-accounting ledger.
///
/// Keys are ordered `(identity, currency)`, which makes
/// [`CurrencyLedger::first_nonzero`] deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyLedger {
    entries: BTreeMap<(Address, Currency), i128>,
}

impl CurrencyLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the entry of `identity` in `currency` and returns the
    /// new total.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::DeltaOverflow`] if the total leaves `i128`; the
    /// entry is left unchanged.
    pub fn apply(&mut self, identity: Address, currency: Currency, delta: i128) -> Result<i128> {
        let current = self.net(identity, currency);
        if delta == 0 {
            return Ok(current);
        }
        let next = current.checked_add(delta).ok_or(FlashError::DeltaOverflow)?;
        if next == 0 {
            self.entries.remove(&(identity, currency));
        } else {
            self.entries.insert((identity, currency), next);
        }
        debug!(identity = %identity, currency = %currency, delta, net = next, "ledger updated");
        Ok(next)
    }

    /// Current entry of `identity` in `currency`; zero when absent.
    #[must_use]
    pub fn net(&self, identity: Address, currency: Currency) -> i128 {
        self.entries.get(&(identity, currency)).copied().unwrap_or(0)
    }

    /// Lowest-ordered non-zero entry, if any.
    #[must_use]
    pub fn first_nonzero(&self) -> Option<(Address, Currency, i128)> {
        self.entries
            .iter()
            .next()
            .map(|(&(identity, currency), &amount)| (identity, currency, amount))
    }

    /// Number of non-zero entries.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if every entry is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over non-zero entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, Currency, i128)> + '_ {
        self.entries
            .iter()
            .map(|(&(identity, currency), &amount)| (identity, currency, amount))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
