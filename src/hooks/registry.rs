//! Policies registered with a manager, keyed by address.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::Address;
use crate::error::{FlashError, Result};
use crate::traits::Hooks;

/// Address book of policy objects.
///
/// A pool key names its policy by address; the registry resolves that
/// address to the object implementing [`Hooks`].
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<Address, Arc<dyn Hooks>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hooks` under `address`, returning the policy it replaces.
    ///
    /// Pools already initialized keep the flags they cached.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidHookFlags`] for the zero address, which
    /// means "no policy", or when the declared flags are inconsistent.
    pub fn register(
        &mut self,
        address: Address,
        hooks: Arc<dyn Hooks>,
    ) -> Result<Option<Arc<dyn Hooks>>> {
        if address.is_zero() {
            return Err(FlashError::InvalidHookFlags(
                "the zero address cannot carry a policy",
            ));
        }
        hooks.flags().validate()?;
        Ok(self.hooks.insert(address, hooks))
    }

    /// Policy registered under `address`.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<Arc<dyn Hooks>> {
        self.hooks.get(address).cloned()
    }

    /// Returns `true` if a policy is registered under `address`.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.hooks.contains_key(address)
    }

    /// Number of registered policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut addresses: Vec<&Address> = self.hooks.keys().collect();
        addresses.sort();
        f.debug_struct("HookRegistry")
            .field("addresses", &addresses)
            .finish()
    }
}
