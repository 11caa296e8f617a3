//! Pool state and the concentrated-liquidity curve engine.
//!
//! | Item | Role |
//! |------|------|
//! | [`PoolState`] | Price, active liquidity, fee growth, ticks and positions of one pool |
//! | [`TickTable`] | Ordered map of initialized ticks with crossing and search |
//! | [`PositionState`] | Liquidity and fee checkpoints of one position |
//! | [`PoolStore`] | Arena of every pool hosted by a manager |
//!
//! The engine knows nothing about sessions, ledgers or hooks. It returns
//! caller-centric deltas and leaves booking them to the manager.

mod pool_state;
mod position_state;
mod store;
mod tick_table;

#[cfg(test)]
mod proptest_properties;

pub use pool_state::{LiquidityChange, PoolState, SwapOutcome};
pub use position_state::PositionState;
pub use store::PoolStore;
pub use tick_table::{max_liquidity_per_tick, TickInfo, TickTable};
