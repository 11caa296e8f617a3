//! Session lock, session tokens and the rollback records kept while a
//! session is open.

use std::collections::HashMap;

use super::ledger::CurrencyLedger;
use super::reserves::Reserves;
use crate::domain::{Address, PoolId};
use crate::error::{FlashError, Result};
use crate::pools::PoolState;

/// Handle proving that the bearer opened the current session.
///
/// Every mutating entry point takes the token and checks it against the
/// lock. A token outlives its session only as a stale value: once the
/// session closes, presenting it fails with [`FlashError::ManagerLocked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken {
    id: u64,
    holder: Address,
}

impl SessionToken {
    pub(crate) const fn new(id: u64, holder: Address) -> Self {
        Self { id, holder }
    }

    /// Sequence number of the session this token belongs to.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Identity that opened the session. Ledger entries created by
    /// operations called with this token are booked under it.
    #[must_use]
    pub const fn holder(&self) -> Address {
        self.holder
    }
}

/// Pool states as they were when the session first touched them.
///
/// `None` records a pool created inside the session.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
    originals: HashMap<PoolId, Option<PoolState>>,
}

impl Journal {
    /// Records `original` for `id` unless the pool was already touched.
    pub(crate) fn record(&mut self, id: PoolId, original: impl FnOnce() -> Option<PoolState>) {
        self.originals.entry(id).or_insert_with(original);
    }

    pub(crate) fn contains(&self, id: &PoolId) -> bool {
        self.originals.contains_key(id)
    }

    pub(crate) fn into_originals(self) -> impl Iterator<Item = (PoolId, Option<PoolState>)> {
        self.originals.into_iter()
    }
}

/// An open session: its token plus what is needed to undo it.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) token: SessionToken,
    pub(crate) journal: Journal,
    pub(crate) reserves: Reserves,
    pub(crate) events: usize,
}

/// Lock state of a manager.
#[derive(Debug, Clone, Default)]
pub(crate) enum LockStatus {
    /// No session is open; mutating operations are refused.
    #[default]
    Unlocked,
    /// A session is open.
    Locked(Session),
}

impl LockStatus {
    /// Opens `session`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::AlreadyLocked`] if a session is already open.
    pub(crate) fn acquire(&mut self, session: Session) -> Result<()> {
        match self {
            Self::Unlocked => {
                *self = Self::Locked(session);
                Ok(())
            }
            Self::Locked(_) => Err(FlashError::AlreadyLocked),
        }
    }

    /// Closes the open session, handing back its rollback records.
    pub(crate) fn release(&mut self) -> Option<Session> {
        match core::mem::take(self) {
            Self::Locked(session) => Some(session),
            Self::Unlocked => None,
        }
    }

    pub(crate) const fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    /// Succeeds only while the session `token` belongs to is open.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ManagerLocked`] otherwise.
    pub(crate) fn check(&self, token: SessionToken) -> Result<()> {
        match self {
            Self::Locked(session) if session.token == token => Ok(()),
            _ => Err(FlashError::ManagerLocked),
        }
    }

    /// Succeeds while any session is open.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::ManagerLocked`] when unlocked.
    pub(crate) fn require_open(&self) -> Result<()> {
        if self.is_locked() {
            Ok(())
        } else {
            Err(FlashError::ManagerLocked)
        }
    }

    /// Journals pool `id` with the state produced by `original`, if a
    /// session is open and has not touched the pool yet.
    pub(crate) fn journal(&mut self, id: PoolId, original: impl FnOnce() -> Option<PoolState>) {
        if let Self::Locked(session) = self {
            session.journal.record(id, original);
        }
    }
}

/// State restored when a single operation fails.
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    pub(crate) pool: Option<(PoolId, Option<PoolState>)>,
    pub(crate) ledger: CurrencyLedger,
    pub(crate) reserves: Reserves,
    pub(crate) events: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn session(id: u64) -> Session {
        Session {
            token: SessionToken::new(id, Address::from_low_byte(1)),
            journal: Journal::default(),
            reserves: Reserves::default(),
            events: 0,
        }
    }

    #[test]
    fn acquire_is_exclusive() {
        let mut lock = LockStatus::default();
        assert!(!lock.is_locked());
        assert_eq!(lock.acquire(session(1)), Ok(()));
        assert_eq!(lock.acquire(session(2)), Err(FlashError::AlreadyLocked));
        assert!(lock.release().is_some_and(|s| s.token.id() == 1));
        assert!(!lock.is_locked());
        assert!(lock.release().is_none());
    }

    #[test]
    fn check_matches_the_open_token() {
        let mut lock = LockStatus::default();
        let token = SessionToken::new(7, Address::from_low_byte(1));
        assert_eq!(lock.check(token), Err(FlashError::ManagerLocked));
        assert_eq!(lock.require_open(), Err(FlashError::ManagerLocked));
        let Ok(()) = lock.acquire(session(7)) else {
            panic!("unlocked");
        };
        assert_eq!(lock.check(token), Ok(()));
        assert_eq!(lock.require_open(), Ok(()));
        let stale = SessionToken::new(6, Address::from_low_byte(1));
        assert_eq!(lock.check(stale), Err(FlashError::ManagerLocked));
        let other_holder = SessionToken::new(7, Address::from_low_byte(2));
        assert_eq!(lock.check(other_holder), Err(FlashError::ManagerLocked));
    }

    #[test]
    fn journal_keeps_first_touch_only() {
        let mut journal = Journal::default();
        let id = PoolId::from_bytes([3; 32]);
        journal.record(id, || None);
        journal.record(id, || panic!("already recorded"));
        assert!(journal.contains(&id));
        assert_eq!(journal.into_originals().count(), 1);
    }
}
