//! Fixed-point arithmetic for the concentrated-liquidity curve.
//!
//! Everything here is integer arithmetic on Q64.64 sqrt prices with 256-bit
//! intermediates (`ethnum::U256`). Rounding is always explicit: amounts paid
//! into a pool round up, amounts paid out round down.
//!
//! | Module | Provides |
//! |--------|----------|
//! | `full_math` | [`mul_div`], [`div_round`], [`Rounding`] |
//! | `tick_math` | [`sqrt_price_at_tick`], [`tick_at_sqrt_price`] |
//! | `sqrt_price_math` | token amounts between prices, next price from an amount |
//! | `swap_math` | [`compute_swap_step`] |
//! | `liquidity_math` | [`add_delta`] |

mod full_math;
mod liquidity_math;
mod sqrt_price_math;
mod swap_math;
mod tick_math;

pub use full_math::{div_round, mul_div, mul_div_u128, narrow, to_i128, Rounding};
pub use liquidity_math::add_delta;
pub use sqrt_price_math::{
    amount0_delta, amount0_delta_signed, amount1_delta, amount1_delta_signed,
    next_sqrt_price_from_input, next_sqrt_price_from_output,
};
pub use swap_math::{compute_swap_step, SwapStep};
pub use tick_math::{sqrt_price_at_tick, tick_at_sqrt_price};

pub(crate) use tick_math::raw_sqrt_price_at_tick;
