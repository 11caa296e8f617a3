//! Value types shared by every layer of the pool manager.
//!
//! Newtypes with validated constructors where a value has a domain
//! (ticks, sqrt prices, pool keys) and plain wrappers where every bit
//! pattern is meaningful (addresses, salts, deltas).

mod address;
mod balance_delta;
mod currency;
mod fee_tier;
mod modify_liquidity_params;
mod pool_key;
mod position;
mod sqrt_price;
mod swap_params;
mod tick;

pub use address::Address;
pub use balance_delta::BalanceDelta;
pub use currency::Currency;
pub use fee_tier::{FeeTier, PIPS_DENOMINATOR};
pub use modify_liquidity_params::{ChangeType, ModifyLiquidityParams};
pub use pool_key::{PoolId, PoolKey};
pub use position::{PositionKey, Salt};
pub use sqrt_price::{SqrtPrice, MAX_SQRT_PRICE, MIN_SQRT_PRICE, Q64};
pub use swap_params::{SwapParams, SwapType};
pub use tick::{Tick, MAX_TICK, MAX_TICK_SPACING, MIN_TICK};
