//! The pool manager: sessions, flash accounting and pool operations.
//!
//! - [`PoolManager`] owns the pool store, the policy registry, the ledger
//!   and custody balances.
//! - [`SessionToken`] authorizes mutating calls during one session.
//! - [`CurrencyLedger`] holds the per-identity, per-currency balances that
//!   must net to zero before a session closes.
//! - [`Event`] is the notification stream for indexers and transfer agents.

mod events;
mod ledger;
mod operations;
mod pool_manager;
mod reserves;
mod session;
mod settlement;

pub use events::Event;
pub use ledger::CurrencyLedger;
pub use operations::{ModifyLiquidityOutcome, OperationStage};
pub use pool_manager::PoolManager;
pub use session::SessionToken;
