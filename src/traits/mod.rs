//! Trait abstractions at the manager's extension seams.
//!
//! [`Hooks`] is the policy interface a pool may name in its key. Policies
//! are stored as `Arc<dyn Hooks>` in a [`HookRegistry`](crate::hooks::HookRegistry)
//! and dispatched by the capability flags cached at pool initialization.

mod hooks;

pub use hooks::Hooks;
