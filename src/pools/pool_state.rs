//! State of one pool and the curve engine that mutates it.
//!
//! # Swap algorithm
//!
//! 1. Find the next initialized tick in the swap direction and clamp its
//!    price to the caller's limit.
//! 2. Resolve one segment with [`compute_swap_step`].
//! 3. Credit the segment fee to the global fee growth of the input currency.
//! 4. If the segment ended on an initialized tick, cross it: flip its
//!    fee-growth-outside values and apply its net liquidity.
//! 5. Repeat until the amount is exhausted or the limit is reached. A limit
//!    reached first is a partial fill, not an error.
//!
//! # Fee tracking
//!
//! `fee_growth_global{0,1}` count fees per unit of liquidity in Q64.64 and
//! wrap on overflow. Positions measure the growth inside their range with
//! the per-tick outside values and are paid on every modification.

use std::collections::HashMap;

use tracing::trace;

use super::position_state::PositionState;
use super::tick_table::{max_liquidity_per_tick, TickInfo, TickTable};
use crate::domain::{
    Address, BalanceDelta, ModifyLiquidityParams, PoolId, PoolKey, PositionKey, SqrtPrice,
    SwapParams, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, Q64,
};
use crate::error::{FlashError, Result};
use crate::hooks::HookConfig;
use crate::math::{
    add_delta, amount0_delta_signed, amount1_delta_signed, compute_swap_step, mul_div_u128,
    raw_sqrt_price_at_tick, tick_at_sqrt_price, to_i128, Rounding,
};

/// Result of a swap against the curve, before hooks are involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Caller-centric amounts: negative is paid in, positive is paid out.
    pub delta: BalanceDelta,
    /// Sqrt price after the swap.
    pub sqrt_price: SqrtPrice,
    /// Tick after the swap.
    pub tick: i32,
    /// Active liquidity after the swap.
    pub liquidity: u128,
    /// Total fee charged in the input currency.
    pub fee_amount: u128,
    /// Curve segments walked.
    pub steps: u32,
}

/// Result of a position modification against the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiquidityChange {
    /// Caller-centric principal: negative when liquidity is added.
    pub principal: BalanceDelta,
    /// Fees earned by the position since its previous modification, paid
    /// out to the caller.
    pub fees_accrued: BalanceDelta,
}

/// One pool: key, price, active liquidity, ticks, positions and the hook
/// configuration resolved when it was initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    id: PoolId,
    key: PoolKey,
    sqrt_price: u128,
    tick: i32,
    liquidity: u128,
    fee_growth_global0: u128,
    fee_growth_global1: u128,
    ticks: TickTable,
    positions: HashMap<PositionKey, PositionState>,
    hooks: Option<HookConfig>,
}

impl PoolState {
    /// Creates an empty pool at `sqrt_price`.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidPrice`] if `sqrt_price` is the maximum
    /// sqrt price, which has no tick above it.
    pub fn new(key: PoolKey, sqrt_price: SqrtPrice, hooks: Option<HookConfig>) -> Result<Self> {
        if sqrt_price.get() >= MAX_SQRT_PRICE {
            return Err(FlashError::InvalidPrice("initial sqrt price must be below the maximum"));
        }
        let tick = tick_at_sqrt_price(sqrt_price)?.get();
        Ok(Self {
            id: key.id(),
            key,
            sqrt_price: sqrt_price.get(),
            tick,
            liquidity: 0,
            fee_growth_global0: 0,
            fee_growth_global1: 0,
            ticks: TickTable::new(),
            positions: HashMap::new(),
            hooks,
        })
    }

    /// Pool identifier.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Pool key.
    #[must_use]
    pub const fn key(&self) -> &PoolKey {
        &self.key
    }

    /// Current sqrt price.
    #[must_use]
    pub const fn sqrt_price(&self) -> SqrtPrice {
        SqrtPrice::from_raw(self.sqrt_price)
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> i32 {
        self.tick
    }

    /// Liquidity active at the current price.
    #[must_use]
    pub const fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Global fee growth of `currency0`.
    #[must_use]
    pub const fn fee_growth_global0(&self) -> u128 {
        self.fee_growth_global0
    }

    /// Global fee growth of `currency1`.
    #[must_use]
    pub const fn fee_growth_global1(&self) -> u128 {
        self.fee_growth_global1
    }

    /// Hook configuration, if the pool has a policy.
    #[must_use]
    pub const fn hooks(&self) -> Option<HookConfig> {
        self.hooks
    }

    /// State of an initialized tick.
    #[must_use]
    pub fn tick_info(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(tick)
    }

    /// The initialized ticks.
    #[must_use]
    pub const fn ticks(&self) -> &TickTable {
        &self.ticks
    }

    /// State of a position, if it holds liquidity.
    #[must_use]
    pub fn position(&self, key: &PositionKey) -> Option<&PositionState> {
        self.positions.get(key)
    }

    /// Number of positions holding liquidity.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Checks that a position range is ordered, in bounds and aligned to the
    /// pool's tick spacing.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidTickRange`] describing the violation.
    pub fn check_tick_range(&self, tick_lower: i32, tick_upper: i32) -> Result<()> {
        let spacing = self.key.tick_spacing();
        if tick_lower >= tick_upper {
            return Err(FlashError::InvalidTickRange("tick_lower must be below tick_upper"));
        }
        if tick_lower < MIN_TICK {
            return Err(FlashError::InvalidTickRange("tick_lower below the minimum tick"));
        }
        if tick_upper > MAX_TICK {
            return Err(FlashError::InvalidTickRange("tick_upper above the maximum tick"));
        }
        if tick_lower % spacing != 0 || tick_upper % spacing != 0 {
            return Err(FlashError::InvalidTickRange("ticks must be multiples of the tick spacing"));
        }
        Ok(())
    }

    /// Checks that the swap's price limit lies strictly between the current
    /// price and the domain bound in the swap direction.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidPriceLimit`] describing the violation.
    pub fn check_price_limit(&self, params: &SwapParams) -> Result<()> {
        let limit = params.sqrt_price_limit().get();
        if params.zero_for_one() {
            if limit >= self.sqrt_price {
                return Err(FlashError::InvalidPriceLimit("limit must be below the current price"));
            }
            if limit <= MIN_SQRT_PRICE {
                return Err(FlashError::InvalidPriceLimit("limit must be above the minimum price"));
            }
        } else {
            if limit <= self.sqrt_price {
                return Err(FlashError::InvalidPriceLimit("limit must be above the current price"));
            }
            if limit >= MAX_SQRT_PRICE {
                return Err(FlashError::InvalidPriceLimit("limit must be below the maximum price"));
            }
        }
        Ok(())
    }

    /// Executes a swap against the curve.
    ///
    /// Walks at most `max_steps` segments. The returned delta reflects a
    /// partial fill when the price limit is reached first.
    ///
    /// # Errors
    ///
    /// - [`FlashError::InvalidSwapAmount`] for a zero amount.
    /// - [`FlashError::InvalidPriceLimit`] for a limit on the wrong side.
    /// - [`FlashError::Overflow`] when more than `max_steps` segments are
    ///   needed or an amount leaves its range.
    ///
    /// On error the pool may be partially updated; callers restore it.
    pub fn swap(&mut self, params: &SwapParams, max_steps: u32) -> Result<SwapOutcome> {
        let amount_specified = params.amount_specified();
        if amount_specified == 0 {
            return Err(FlashError::InvalidSwapAmount);
        }
        self.check_price_limit(params)?;

        let zero_for_one = params.zero_for_one();
        let exact_in = amount_specified < 0;
        let fee_pips = self.key.fee().pips();
        let limit = params.sqrt_price_limit().get();

        let mut remaining = amount_specified;
        let mut calculated: i128 = 0;
        let mut sqrt_price = self.sqrt_price;
        let mut tick = self.tick;
        let mut liquidity = self.liquidity;
        let mut fee_growth = if zero_for_one {
            self.fee_growth_global0
        } else {
            self.fee_growth_global1
        };
        let mut fee_total: u128 = 0;
        let mut steps: u32 = 0;

        while remaining != 0 && sqrt_price != limit {
            steps += 1;
            if steps > max_steps {
                return Err(FlashError::Overflow("swap step limit exceeded"));
            }
            let step_start = sqrt_price;
            let (next_tick, initialized) = self.ticks.next_initialized(tick, zero_for_one);
            let next_tick = next_tick.clamp(MIN_TICK, MAX_TICK);
            let sqrt_price_next_tick = raw_sqrt_price_at_tick(next_tick);
            let target = if zero_for_one {
                sqrt_price_next_tick.max(limit)
            } else {
                sqrt_price_next_tick.min(limit)
            };

            let step = compute_swap_step(sqrt_price, target, liquidity, remaining, fee_pips)?;
            sqrt_price = step.sqrt_price_next;

            let paid = step
                .amount_in
                .checked_add(step.fee_amount)
                .ok_or(FlashError::Overflow("swap input exceeds u128"))?;
            let paid = to_i128(paid, "swap input exceeds i128")?;
            let received = to_i128(step.amount_out, "swap output exceeds i128")?;
            let (next_remaining, next_calculated) = if exact_in {
                (remaining.checked_add(paid), calculated.checked_add(received))
            } else {
                (remaining.checked_sub(received), calculated.checked_sub(paid))
            };
            remaining = next_remaining.ok_or(FlashError::Overflow("swap remainder"))?;
            calculated = next_calculated.ok_or(FlashError::Overflow("swap amount"))?;

            fee_total = fee_total
                .checked_add(step.fee_amount)
                .ok_or(FlashError::Overflow("swap fee exceeds u128"))?;
            if liquidity > 0 && step.fee_amount > 0 {
                let growth = mul_div_u128(step.fee_amount, Q64, liquidity, Rounding::Down)?;
                fee_growth = fee_growth.wrapping_add(growth);
            }

            if sqrt_price == sqrt_price_next_tick {
                if initialized {
                    let (global0, global1) = if zero_for_one {
                        (fee_growth, self.fee_growth_global1)
                    } else {
                        (self.fee_growth_global0, fee_growth)
                    };
                    let net = self.ticks.cross(next_tick, global0, global1);
                    let net = if zero_for_one {
                        net.checked_neg()
                            .ok_or(FlashError::Overflow("tick net liquidity"))?
                    } else {
                        net
                    };
                    liquidity = add_delta(liquidity, net)?;
                }
                tick = if zero_for_one { next_tick - 1 } else { next_tick };
            } else if sqrt_price != step_start {
                tick = tick_at_sqrt_price(SqrtPrice::from_raw(sqrt_price))?.get();
            }

            trace!(
                pool = %self.id,
                step = steps,
                sqrt_price,
                tick,
                liquidity,
                amount_in = step.amount_in,
                amount_out = step.amount_out,
                fee = step.fee_amount,
                "swap step"
            );
        }

        self.sqrt_price = sqrt_price;
        self.tick = tick;
        self.liquidity = liquidity;
        if zero_for_one {
            self.fee_growth_global0 = fee_growth;
        } else {
            self.fee_growth_global1 = fee_growth;
        }

        let consumed = amount_specified
            .checked_sub(remaining)
            .ok_or(FlashError::Overflow("swap amount"))?;
        let delta = if zero_for_one == exact_in {
            BalanceDelta::new(consumed, calculated)
        } else {
            BalanceDelta::new(calculated, consumed)
        };
        Ok(SwapOutcome {
            delta,
            sqrt_price: SqrtPrice::from_raw(sqrt_price),
            tick,
            liquidity,
            fee_amount: fee_total,
            steps,
        })
    }

    /// Adds liquidity to, removes liquidity from, or pokes the position of
    /// `owner` described by `params`.
    ///
    /// Fees earned by the position so far are always paid out, including
    /// when liquidity is added.
    ///
    /// # Errors
    ///
    /// - [`FlashError::InvalidTickRange`] for an invalid range.
    /// - [`FlashError::PositionNotFound`] when poking an empty position.
    /// - [`FlashError::InsufficientLiquidity`] when removing more than the
    ///   position holds.
    /// - [`FlashError::Overflow`] when tick liquidity exceeds its bound.
    ///
    /// On error the pool may be partially updated; callers restore it.
    pub fn modify_liquidity(
        &mut self,
        owner: Address,
        params: &ModifyLiquidityParams,
    ) -> Result<LiquidityChange> {
        let (lower, upper) = (params.tick_lower(), params.tick_upper());
        self.check_tick_range(lower, upper)?;
        let liquidity_delta = params.liquidity_delta();
        let key = PositionKey::new(owner, lower, upper, params.salt());

        let mut position = self.positions.get(&key).copied().unwrap_or_default();
        if liquidity_delta == 0 && position.liquidity() == 0 {
            return Err(FlashError::PositionNotFound);
        }
        if liquidity_delta < 0 && liquidity_delta.unsigned_abs() > position.liquidity() {
            return Err(FlashError::InsufficientLiquidity);
        }

        let (global0, global1) = (self.fee_growth_global0, self.fee_growth_global1);
        let (mut flipped_lower, mut flipped_upper) = (false, false);
        if liquidity_delta != 0 {
            let max = max_liquidity_per_tick(self.key.tick_spacing());
            flipped_lower =
                self.ticks.update(lower, self.tick, liquidity_delta, global0, global1, false, max)?;
            flipped_upper =
                self.ticks.update(upper, self.tick, liquidity_delta, global0, global1, true, max)?;
        }

        let (inside0, inside1) =
            self.ticks.fee_growth_inside(lower, upper, self.tick, global0, global1);
        let (fees0, fees1) = position.update(liquidity_delta, inside0, inside1)?;
        if position.liquidity() == 0 {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, position);
        }

        if liquidity_delta < 0 {
            if flipped_lower {
                self.ticks.clear(lower);
            }
            if flipped_upper {
                self.ticks.clear(upper);
            }
        }

        let principal = self.principal_delta(lower, upper, liquidity_delta)?;
        let fees_accrued = BalanceDelta::new(
            to_i128(fees0, "fees exceed i128")?,
            to_i128(fees1, "fees exceed i128")?,
        );
        Ok(LiquidityChange {
            principal,
            fees_accrued,
        })
    }

    /// Distributes `amount0` and `amount1` to the liquidity active at the
    /// current price, returning the caller-centric delta.
    ///
    /// # Errors
    ///
    /// - [`FlashError::NoLiquidityToReceiveFees`] when no liquidity is
    ///   active.
    /// - [`FlashError::Overflow`] for amounts above `i128::MAX`.
    pub fn donate(&mut self, amount0: u128, amount1: u128) -> Result<BalanceDelta> {
        if self.liquidity == 0 {
            return Err(FlashError::NoLiquidityToReceiveFees);
        }
        let delta = BalanceDelta::new(
            -to_i128(amount0, "donation exceeds i128")?,
            -to_i128(amount1, "donation exceeds i128")?,
        );
        if amount0 > 0 {
            let growth = mul_div_u128(amount0, Q64, self.liquidity, Rounding::Down)?;
            self.fee_growth_global0 = self.fee_growth_global0.wrapping_add(growth);
        }
        if amount1 > 0 {
            let growth = mul_div_u128(amount1, Q64, self.liquidity, Rounding::Down)?;
            self.fee_growth_global1 = self.fee_growth_global1.wrapping_add(growth);
        }
        Ok(delta)
    }

    /// Token amounts backing `liquidity_delta` over `[lower, upper)` at the
    /// current price, caller-centric. Updates active liquidity when the
    /// range contains the current tick.
    fn principal_delta(
        &mut self,
        lower: i32,
        upper: i32,
        liquidity_delta: i128,
    ) -> Result<BalanceDelta> {
        if liquidity_delta == 0 {
            return Ok(BalanceDelta::ZERO);
        }
        let sqrt_lower = raw_sqrt_price_at_tick(lower);
        let sqrt_upper = raw_sqrt_price_at_tick(upper);

        let (amount0, amount1) = if self.tick < lower {
            (amount0_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?, 0)
        } else if self.tick < upper {
            let amount0 = amount0_delta_signed(self.sqrt_price, sqrt_upper, liquidity_delta)?;
            let amount1 = amount1_delta_signed(sqrt_lower, self.sqrt_price, liquidity_delta)?;
            self.liquidity = add_delta(self.liquidity, liquidity_delta)?;
            (amount0, amount1)
        } else {
            (0, amount1_delta_signed(sqrt_lower, sqrt_upper, liquidity_delta)?)
        };
        // Signed amounts are owed to the pool; the caller sees the opposite.
        BalanceDelta::new(amount0, amount1)
            .checked_neg()
            .ok_or(FlashError::DeltaOverflow)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Currency, FeeTier, Salt};

    const L: u128 = 1_000_000_000_000_000_000;
    const SQRT_M60: u128 = 18_391_489_527_427_947_883;

    fn key(spacing: i32) -> PoolKey {
        let Ok(k) = PoolKey::new(
            Currency::Token(Address::from_low_byte(1)),
            Currency::Token(Address::from_low_byte(2)),
            FeeTier::MEDIUM,
            spacing,
            Address::ZERO,
        ) else {
            panic!("valid key");
        };
        k
    }

    fn pool() -> PoolState {
        let Ok(p) = PoolState::new(key(60), SqrtPrice::ONE, None) else {
            panic!("valid pool");
        };
        p
    }

    fn owner() -> Address {
        Address::from_low_byte(0xaa)
    }

    fn params(lower: i32, upper: i32, delta: i128) -> ModifyLiquidityParams {
        ModifyLiquidityParams::new(lower, upper, delta, Salt::ZERO)
    }

    fn with_liquidity() -> PoolState {
        let mut p = pool();
        let Ok(_) = p.modify_liquidity(owner(), &params(-60, 60, L as i128)) else {
            panic!("add should succeed");
        };
        p
    }

    fn exact_in(zero_for_one: bool, amount: u128) -> SwapParams {
        let limit = if zero_for_one {
            SqrtPrice::MIN_LIMIT
        } else {
            SqrtPrice::MAX_LIMIT
        };
        let Ok(p) = SwapParams::exact_in(zero_for_one, amount, limit) else {
            panic!("valid params");
        };
        p
    }

    // -- initialization ----------------------------------------------------

    #[test]
    fn new_pool_derives_tick_from_price() {
        let p = pool();
        assert_eq!(p.tick(), 0);
        assert_eq!(p.liquidity(), 0);
        assert_eq!(p.id(), key(60).id());
        assert!(p.ticks().is_empty());
    }

    #[test]
    fn maximum_price_rejected() {
        assert!(matches!(
            PoolState::new(key(60), SqrtPrice::MAX, None),
            Err(FlashError::InvalidPrice(_))
        ));
    }

    // -- modify_liquidity --------------------------------------------------

    #[test]
    fn add_in_range_owes_both_currencies() {
        let mut p = pool();
        let Ok(change) = p.modify_liquidity(owner(), &params(-60, 60, L as i128)) else {
            panic!("add should succeed");
        };
        assert_eq!(
            change.principal,
            BalanceDelta::new(-2_995_354_955_910_781, -2_995_354_955_910_781)
        );
        assert_eq!(change.fees_accrued, BalanceDelta::ZERO);
        assert_eq!(p.liquidity(), L);
        assert_eq!(p.position_count(), 1);
        assert!(p.tick_info(-60).is_some());
        assert!(p.tick_info(60).is_some());
    }

    #[test]
    fn add_out_of_range_is_single_sided() {
        let mut p = pool();
        let Ok(above) = p.modify_liquidity(owner(), &params(60, 120, 1_000_000)) else {
            panic!("add should succeed");
        };
        assert!(above.principal.amount0() < 0);
        assert_eq!(above.principal.amount1(), 0);

        let Ok(below) = p.modify_liquidity(owner(), &params(-120, -60, 1_000_000)) else {
            panic!("add should succeed");
        };
        assert_eq!(below.principal.amount0(), 0);
        assert!(below.principal.amount1() < 0);
        assert_eq!(p.liquidity(), 0);
    }

    #[test]
    fn invalid_ranges_rejected() {
        let mut p = pool();
        for (lower, upper) in [(60, 60), (60, -60), (-61, 60), (-60, 90), (MIN_TICK - 60, 60)] {
            assert!(
                matches!(
                    p.modify_liquidity(owner(), &params(lower, upper, 1)),
                    Err(FlashError::InvalidTickRange(_))
                ),
                "range [{lower}, {upper})"
            );
        }
        assert!(p.ticks().is_empty());
    }

    #[test]
    fn remove_more_than_held_rejected() {
        let mut p = with_liquidity();
        assert_eq!(
            p.modify_liquidity(owner(), &params(-60, 60, -(L as i128) - 1)),
            Err(FlashError::InsufficientLiquidity)
        );
    }

    #[test]
    fn poke_empty_position_rejected() {
        let mut p = pool();
        assert_eq!(
            p.modify_liquidity(owner(), &params(-60, 60, 0)),
            Err(FlashError::PositionNotFound)
        );
    }

    #[test]
    fn salts_are_independent_positions() {
        let mut p = with_liquidity();
        let salted = ModifyLiquidityParams::new(-60, 60, 5, Salt::from_u64(1));
        let Ok(_) = p.modify_liquidity(owner(), &salted) else {
            panic!("add should succeed");
        };
        assert_eq!(p.position_count(), 2);
        let plain = PositionKey::new(owner(), -60, 60, Salt::ZERO);
        let Some(position) = p.position(&plain) else {
            panic!("position exists");
        };
        assert_eq!(position.liquidity(), L);
    }

    #[test]
    fn full_removal_clears_ticks_and_position() {
        let mut p = with_liquidity();
        let Ok(change) = p.modify_liquidity(owner(), &params(-60, 60, -(L as i128))) else {
            panic!("remove should succeed");
        };
        // Rounding keeps one unit in the pool on each side.
        assert_eq!(
            change.principal,
            BalanceDelta::new(2_995_354_955_910_780, 2_995_354_955_910_780)
        );
        assert_eq!(p.position_count(), 0);
        assert!(p.ticks().is_empty());
        assert_eq!(p.liquidity(), 0);
    }

    // -- swap ----------------------------------------------------------------

    #[test]
    fn exact_in_within_one_range() {
        let mut p = with_liquidity();
        let Ok(out) = p.swap(&exact_in(true, 1_000_000), 64) else {
            panic!("swap should succeed");
        };
        assert_eq!(out.delta, BalanceDelta::new(-1_000_000, 996_999));
        assert_eq!(out.fee_amount, 3_000);
        assert_eq!(out.steps, 1);
        assert_eq!(p.sqrt_price().get(), 18_446_744_073_691_160_213);
        assert_eq!(p.tick(), -1);
        // 3000 * 2^64 / 1e18
        assert_eq!(p.fee_growth_global0(), 55_340);
        assert_eq!(p.fee_growth_global1(), 0);
    }

    #[test]
    fn exact_out_within_one_range() {
        let mut p = with_liquidity();
        let Ok(params) = SwapParams::exact_out(true, 1_000_000, SqrtPrice::MIN_LIMIT) else {
            panic!("valid params");
        };
        let Ok(out) = p.swap(&params, 64) else {
            panic!("swap should succeed");
        };
        assert_eq!(out.delta, BalanceDelta::new(-1_003_011, 1_000_000));
    }

    #[test]
    fn price_limit_gives_partial_fill() {
        let mut p = with_liquidity();
        let Ok(limit) = SqrtPrice::new(SQRT_M60) else {
            panic!("valid price");
        };
        let Ok(params) = SwapParams::exact_in(true, u128::from(u64::MAX), limit) else {
            panic!("valid params");
        };
        let Ok(out) = p.swap(&params, 64) else {
            panic!("swap should succeed");
        };
        assert_eq!(p.sqrt_price().get(), SQRT_M60);
        assert!(out.delta.amount0() > -(i128::from(u64::MAX)));
        assert!(out.delta.amount1() > 0);
    }

    #[test]
    fn crossing_out_of_range_drops_liquidity() {
        let mut p = with_liquidity();
        // Far more input than the range can absorb.
        let Ok(out) = p.swap(&exact_in(true, 1_000_000_000_000_000_000), 64) else {
            panic!("swap should succeed");
        };
        assert_eq!(p.liquidity(), 0);
        assert_eq!(p.sqrt_price(), SqrtPrice::MIN_LIMIT);
        assert!(out.steps >= 2);
        // Output is capped by what the range held.
        assert!(out.delta.amount1() <= 2_995_354_955_910_781);
    }

    #[test]
    fn round_trip_through_tick_restores_liquidity() {
        let mut p = with_liquidity();
        let Ok(_) = p.swap(&exact_in(true, 1_000_000_000_000_000_000), 64) else {
            panic!("swap should succeed");
        };
        let Ok(_) = p.swap(&exact_in(false, 1_000_000_000_000), 64) else {
            panic!("swap should succeed");
        };
        assert_eq!(p.liquidity(), L);
        assert!(p.tick() >= -60 && p.tick() < 60);
    }

    #[test]
    fn swap_validation() {
        let mut p = with_liquidity();
        let zero = SwapParams::new(true, 0, SqrtPrice::MIN_LIMIT);
        assert_eq!(p.swap(&zero, 64), Err(FlashError::InvalidSwapAmount));

        let wrong_side = SwapParams::new(true, -1, SqrtPrice::MAX_LIMIT);
        assert!(matches!(p.swap(&wrong_side, 64), Err(FlashError::InvalidPriceLimit(_))));

        let at_bound = SwapParams::new(true, -1, SqrtPrice::MIN);
        assert!(matches!(p.swap(&at_bound, 64), Err(FlashError::InvalidPriceLimit(_))));

        let at_current = SwapParams::new(false, -1, SqrtPrice::ONE);
        assert!(matches!(p.swap(&at_current, 64), Err(FlashError::InvalidPriceLimit(_))));
    }

    #[test]
    fn step_limit_enforced() {
        let mut p = with_liquidity();
        assert_eq!(
            p.swap(&exact_in(true, 1_000_000_000_000_000_000), 1),
            Err(FlashError::Overflow("swap step limit exceeded"))
        );
    }

    // -- fees ----------------------------------------------------------------

    #[test]
    fn swap_fees_paid_on_removal() {
        let mut p = with_liquidity();
        let Ok(_) = p.swap(&exact_in(true, 1_000_000), 64) else {
            panic!("swap should succeed");
        };
        let Ok(change) = p.modify_liquidity(owner(), &params(-60, 60, -(L as i128))) else {
            panic!("remove should succeed");
        };
        assert_eq!(change.fees_accrued, BalanceDelta::new(2_999, 0));
        assert_eq!(
            change.principal,
            BalanceDelta::new(2_995_354_956_907_780, 2_995_354_954_913_780)
        );
    }

    #[test]
    fn fees_paid_when_adding_more() {
        let mut p = with_liquidity();
        let Ok(_) = p.swap(&exact_in(true, 1_000_000), 64) else {
            panic!("swap should succeed");
        };
        let Ok(change) = p.modify_liquidity(owner(), &params(-60, 60, 1_000)) else {
            panic!("add should succeed");
        };
        assert_eq!(change.fees_accrued, BalanceDelta::new(2_999, 0));
        assert!(change.principal.amount0() < 0);

        // A poke right after owes nothing new.
        let Ok(poke) = p.modify_liquidity(owner(), &params(-60, 60, 0)) else {
            panic!("poke should succeed");
        };
        assert_eq!(poke.fees_accrued, BalanceDelta::ZERO);
        assert_eq!(poke.principal, BalanceDelta::ZERO);
    }

    #[test]
    fn donate_credits_in_range_liquidity() {
        let mut p = pool();
        assert_eq!(p.donate(1, 1), Err(FlashError::NoLiquidityToReceiveFees));

        let mut p = with_liquidity();
        assert_eq!(p.donate(1_000_000, 0), Ok(BalanceDelta::new(-1_000_000, 0)));
        let Ok(change) = p.modify_liquidity(owner(), &params(-60, 60, 0)) else {
            panic!("poke should succeed");
        };
        // 1e6 * 2^64 / 1e18 floors to 18446744, paid back as 999_999.
        assert_eq!(change.fees_accrued, BalanceDelta::new(999_999, 0));
    }
}
