//! Property-based tests using `proptest` for curve and ledger invariants.
//!
//! 1. **Tick math consistency**: `tick_at_sqrt_price(sqrt_price_at_tick(t)) == t`
//!    and the mapping is strictly increasing.
//! 2. **Swap reversibility**: a round trip never returns more than was put in.
//! 3. **Exact amounts honoured**: exact input is consumed in full when the
//!    limit does not bind; exact output is never exceeded.
//! 4. **Fee monotonicity**: a larger input never pays a smaller fee.
//! 5. **Liquidity conservation**: add then remove never returns more than
//!    was deposited.
//! 6. **Price direction**: selling `currency0` never raises the price.
//! 7. **Ledger netting**: applying a sequence of deltas and their negations
//!    in any order leaves every entry at zero.

#![allow(clippy::panic)]

use proptest::prelude::*;

use crate::domain::{
    Address, Currency, FeeTier, ModifyLiquidityParams, PoolKey, Salt, SqrtPrice, SwapParams, Tick,
    MAX_TICK, MIN_TICK,
};
use crate::manager::CurrencyLedger;
use crate::math::{sqrt_price_at_tick, tick_at_sqrt_price};
use crate::pools::PoolState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const MAX_STEPS: u32 = 1_024;

fn make_key(fee: FeeTier) -> PoolKey {
    let Ok(key) = PoolKey::new(
        Currency::Token(Address::from_low_byte(1)),
        Currency::Token(Address::from_low_byte(2)),
        fee,
        60,
        Address::ZERO,
    ) else {
        panic!("valid key");
    };
    key
}

fn owner() -> Address {
    Address::from_low_byte(0x11)
}

/// Pool at price 1 with `liquidity` over `[-width, width)`.
fn make_pool(fee: FeeTier, width: i32, liquidity: u128) -> PoolState {
    let Ok(mut pool) = PoolState::new(make_key(fee), SqrtPrice::ONE, None) else {
        panic!("valid pool");
    };
    let params = ModifyLiquidityParams::new(-width, width, liquidity as i128, Salt::ZERO);
    let Ok(_) = pool.modify_liquidity(owner(), &params) else {
        panic!("valid liquidity");
    };
    pool
}

fn exact_in(zero_for_one: bool, amount: u128) -> SwapParams {
    let limit = if zero_for_one {
        SqrtPrice::MIN_LIMIT
    } else {
        SqrtPrice::MAX_LIMIT
    };
    let Ok(params) = SwapParams::exact_in(zero_for_one, amount, limit) else {
        panic!("valid params");
    };
    params
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Liquidity in [1e12, 1e24].
fn liquidity_strategy() -> impl Strategy<Value = u128> {
    (12u32..=24u32).prop_map(|e| 10u128.pow(e))
}

/// Swap amounts small enough to stay within a wide range.
fn amount_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=1_000_000_000u128
}

/// Range half-widths that are multiples of 60.
fn width_strategy() -> impl Strategy<Value = i32> {
    (1i32..=200i32).prop_map(|w| w * 60)
}

fn fee_strategy() -> impl Strategy<Value = FeeTier> {
    prop_oneof![
        Just(FeeTier::LOWEST),
        Just(FeeTier::LOW),
        Just(FeeTier::MEDIUM),
        Just(FeeTier::HIGH),
    ]
}

// ---------------------------------------------------------------------------
// Property 1: Tick math consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_tick_round_trip(t in MIN_TICK..=MAX_TICK) {
        let Ok(tick) = Tick::new(t) else {
            return Ok(());
        };
        let price = sqrt_price_at_tick(tick);
        prop_assert_eq!(tick_at_sqrt_price(price), Ok(tick));
    }

    #[test]
    fn prop_sqrt_price_strictly_increasing(t in MIN_TICK..MAX_TICK) {
        let (Ok(a), Ok(b)) = (Tick::new(t), Tick::new(t + 1)) else {
            return Ok(());
        };
        prop_assert!(sqrt_price_at_tick(a) < sqrt_price_at_tick(b));
    }
}

// ---------------------------------------------------------------------------
// Properties 2-4: Swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(
        liquidity in liquidity_strategy(),
        amount in amount_strategy(),
        width in width_strategy(),
        fee in fee_strategy(),
    ) {
        let mut pool = make_pool(fee, width, liquidity);
        let Ok(forward) = pool.swap(&exact_in(true, amount), MAX_STEPS) else {
            return Ok(());
        };
        let received = forward.delta.amount1();
        prop_assume!(received > 0);

        let Ok(back) = pool.swap(&exact_in(false, received.unsigned_abs()), MAX_STEPS) else {
            return Ok(());
        };
        prop_assert!(
            back.delta.amount0() <= amount as i128,
            "round trip should lose value: final={} > original={}",
            back.delta.amount0(), amount
        );
    }

    #[test]
    fn prop_exact_input_consumed(
        liquidity in liquidity_strategy(),
        amount in amount_strategy(),
        zero_for_one in any::<bool>(),
    ) {
        let mut pool = make_pool(FeeTier::MEDIUM, 6_000, liquidity);
        let Ok(out) = pool.swap(&exact_in(zero_for_one, amount), MAX_STEPS) else {
            return Ok(());
        };
        // The range is wide enough that the limit never binds first.
        prop_assume!(pool.liquidity() == liquidity);
        prop_assert_eq!(out.delta.amount_for(zero_for_one), -(amount as i128));
        prop_assert!(out.delta.amount_for(!zero_for_one) >= 0);
    }

    #[test]
    fn prop_exact_output_never_exceeded(
        liquidity in liquidity_strategy(),
        amount in amount_strategy(),
        zero_for_one in any::<bool>(),
    ) {
        let mut pool = make_pool(FeeTier::MEDIUM, 6_000, liquidity);
        let limit = if zero_for_one { SqrtPrice::MIN_LIMIT } else { SqrtPrice::MAX_LIMIT };
        let Ok(params) = SwapParams::exact_out(zero_for_one, amount, limit) else {
            return Ok(());
        };
        let Ok(out) = pool.swap(&params, MAX_STEPS) else {
            return Ok(());
        };
        prop_assert!(out.delta.amount_for(!zero_for_one) <= amount as i128);
        prop_assert!(out.delta.amount_for(zero_for_one) < 0);
    }

    #[test]
    fn prop_fee_monotonic(
        liquidity in liquidity_strategy(),
        small in amount_strategy(),
        extra in 0u128..=1_000_000u128,
    ) {
        let large = small + extra;
        let mut pool_small = make_pool(FeeTier::MEDIUM, 6_000, liquidity);
        let mut pool_large = pool_small.clone();
        let (Ok(a), Ok(b)) = (
            pool_small.swap(&exact_in(true, small), MAX_STEPS),
            pool_large.swap(&exact_in(true, large), MAX_STEPS),
        ) else {
            return Ok(());
        };
        prop_assert!(b.fee_amount >= a.fee_amount);
    }

    #[test]
    fn prop_zero_for_one_lowers_price(
        liquidity in liquidity_strategy(),
        amount in amount_strategy(),
    ) {
        let mut pool = make_pool(FeeTier::LOW, 600, liquidity);
        let before = pool.sqrt_price();
        let Ok(_) = pool.swap(&exact_in(true, amount), MAX_STEPS) else {
            return Ok(());
        };
        prop_assert!(pool.sqrt_price() <= before);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Liquidity conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_add_remove_never_profits(
        liquidity in liquidity_strategy(),
        lower in -100i32..=99,
        span in 1i32..=100,
    ) {
        let Ok(mut pool) = PoolState::new(make_key(FeeTier::MEDIUM), SqrtPrice::ONE, None) else {
            return Ok(());
        };
        let (lower, upper) = (lower * 60, (lower + span) * 60);
        let add = ModifyLiquidityParams::new(lower, upper, liquidity as i128, Salt::ZERO);
        let Ok(added) = pool.modify_liquidity(owner(), &add) else {
            return Ok(());
        };
        let remove = add.with_liquidity_delta(-(liquidity as i128));
        let Ok(removed) = pool.modify_liquidity(owner(), &remove) else {
            return Ok(());
        };
        let Some(net) = added.principal.checked_add(removed.principal) else {
            return Ok(());
        };
        prop_assert!(net.amount0() <= 0 && net.amount1() <= 0, "net = {}", net);
        prop_assert_eq!(pool.position_count(), 0);
        prop_assert!(pool.ticks().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 7: Ledger netting
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_ledger_nets_to_zero(
        moves in prop::collection::vec(
            (0u8..4, any::<bool>(), -1_000_000i128..=1_000_000),
            1..32,
        ),
    ) {
        let currencies = [Currency::Native, Currency::Token(Address::from_low_byte(9))];
        let mut ledger = CurrencyLedger::new();
        for &(who, which, amount) in &moves {
            let currency = currencies[usize::from(which)];
            prop_assert!(ledger.apply(Address::from_low_byte(who), currency, amount).is_ok());
        }
        for &(who, which, amount) in moves.iter().rev() {
            let currency = currencies[usize::from(which)];
            prop_assert!(ledger.apply(Address::from_low_byte(who), currency, -amount).is_ok());
        }
        prop_assert_eq!(ledger.first_nonzero(), None);
        prop_assert_eq!(ledger.net(Address::from_low_byte(0), Currency::Native), 0);
    }
}
