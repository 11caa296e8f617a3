//! Arena of pool states keyed by [`PoolId`].

use std::collections::HashMap;

use super::pool_state::PoolState;
use crate::domain::PoolId;
use crate::error::{FlashError, Result};

/// Every pool hosted by one manager.
///
/// Pools are created once and never deleted. The store is owned by the
/// manager and handed to operations by reference.
#[derive(Debug, Clone, Default)]
pub struct PoolStore {
    pools: HashMap<PoolId, PoolState>,
}

impl PoolStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` names an initialized pool.
    #[must_use]
    pub fn contains(&self, id: &PoolId) -> bool {
        self.pools.contains_key(id)
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if the store holds no pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Pool `id`, if initialized.
    #[must_use]
    pub fn get(&self, id: &PoolId) -> Option<&PoolState> {
        self.pools.get(id)
    }

    /// Pool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::PoolNotInitialized`] for an unknown id.
    pub fn require(&self, id: &PoolId) -> Result<&PoolState> {
        self.pools.get(id).ok_or(FlashError::PoolNotInitialized)
    }

    /// Mutable access to pool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::PoolNotInitialized`] for an unknown id.
    pub fn require_mut(&mut self, id: &PoolId) -> Result<&mut PoolState> {
        self.pools.get_mut(id).ok_or(FlashError::PoolNotInitialized)
    }

    /// Adds a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::PoolAlreadyInitialized`] if the id is taken.
    pub fn insert(&mut self, pool: PoolState) -> Result<()> {
        let id = pool.id();
        if self.pools.contains_key(&id) {
            return Err(FlashError::PoolAlreadyInitialized);
        }
        self.pools.insert(id, pool);
        Ok(())
    }

    /// Puts back a saved copy of a pool, or drops the pool when `saved` is
    /// `None`. Used to undo operations and sessions.
    pub(crate) fn restore(&mut self, id: PoolId, saved: Option<PoolState>) {
        match saved {
            Some(pool) => {
                self.pools.insert(id, pool);
            }
            None => {
                self.pools.remove(&id);
            }
        }
    }

    /// Iterates over all pools in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&PoolId, &PoolState)> {
        self.pools.iter()
    }
}
