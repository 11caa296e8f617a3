//! Policy hooks: capability flags, results, the context handed to a policy
//! and the registry that resolves policies by address.
//!
//! A pool names its policy by address in its [`PoolKey`](crate::domain::PoolKey).
//! At initialization the manager looks the address up in its
//! [`HookRegistry`], reads the policy's [`HookFlags`] once and caches them
//! in a [`HookConfig`]. Operations then consult only the cached flags.

mod context;
pub(crate) mod dispatcher;
mod flags;
mod registry;
mod result;

pub use context::HookContext;
pub use flags::{HookConfig, HookFlags, HookPoint};
pub use registry::HookRegistry;
pub use result::HookResult;
