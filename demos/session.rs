//! Flash-accounting session walkthrough.
//!
//! Demonstrates creating a pool, providing liquidity, swapping and settling
//! every balance inside sessions, then withdrawing the position with the
//! fees it earned.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=hydra_flash=debug cargo run --example session
//! ```

use hydra_flash::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Flash-accounting session ===\n");

    // ── 1. Create the pool ──────────────────────────────────────────────
    let usd = Currency::Token(Address::from_low_byte(0x01));
    let eur = Currency::Token(Address::from_low_byte(0x02));
    let lp = Address::from_low_byte(0xA1);
    let trader = Address::from_low_byte(0xB2);

    let mut manager = PoolManager::default();
    let key = PoolKey::new(usd, eur, FeeTier::MEDIUM, 60, Address::ZERO)?;
    let id = manager.initialize(lp, key, SqrtPrice::ONE)?;
    println!("Pool {id}");
    println!("  Fee:           {} pips", key.fee().pips());
    println!("  Tick spacing:  {}", key.tick_spacing());

    // ── 2. Provide liquidity around the current price ───────────────────
    //    The position is paid for inside the same session.
    let range = ModifyLiquidityParams::new(-60, 60, 1_000_000_000_000_000_000, Salt::ZERO);
    let added = manager.open(lp, |m, token| {
        let outcome = m.modify_liquidity(token, &key, range, &[])?;
        m.settle(token, key.currency0(), outcome.delta.amount0().unsigned_abs())?;
        m.settle(token, key.currency1(), outcome.delta.amount1().unsigned_abs())?;
        Ok(outcome.delta)
    })?;
    println!("\nLiquidity added, paid {added}");
    println!("  Reserves:      {} / {}", manager.reserves(usd), manager.reserves(eur));

    // ── 3. Swap, then settle both sides before the session closes ──────
    let params = SwapParams::exact_in(true, 1_000_000, SqrtPrice::MIN_LIMIT)?;
    let swapped = manager.open(trader, |m, token| {
        let delta = m.swap(token, &key, params, &[])?;
        println!("\nMid-session ledger of the trader:");
        println!("  owes {}:       {}", usd, m.net_delta(token.holder(), usd));
        println!("  owes {}:       {}", eur, m.net_delta(token.holder(), eur));
        m.settle(token, usd, delta.amount0().unsigned_abs())?;
        m.take(token, eur, trader, delta.amount1().unsigned_abs())?;
        Ok(delta)
    })?;
    println!("Swap settled: {swapped}");
    if let Some(pool) = manager.pool(&id) {
        println!("  Tick now:      {}", pool.tick());
    }

    // ── 4. An unsettled session is rolled back ──────────────────────────
    let unsettled = manager.open(trader, |m, token| {
        m.swap(token, &key, params, &[])?;
        Ok(())
    });
    match unsettled {
        Ok(()) => println!("\nUnexpected: unsettled session closed"),
        Err(e) => println!("\nUnsettled session refused: {e}"),
    }

    // ── 5. Withdraw the position with its fees ──────────────────────────
    let removal = ModifyLiquidityParams::new(-60, 60, -1_000_000_000_000_000_000, Salt::ZERO);
    let removed = manager.open(lp, |m, token| {
        let outcome = m.modify_liquidity(token, &key, removal, &[])?;
        m.take(token, usd, lp, outcome.delta.amount0().unsigned_abs())?;
        m.take(token, eur, lp, outcome.delta.amount1().unsigned_abs())?;
        Ok(outcome)
    })?;
    println!("\nLiquidity removed: {}", removed.delta);
    println!("  Fees earned:   {}", removed.fees_accrued);
    println!("  Dust left:     {} / {}", manager.reserves(usd), manager.reserves(eur));

    // ── 6. Events for indexers ──────────────────────────────────────────
    println!("\nEvents:");
    for event in manager.drain_events() {
        println!("  {}", serde_json::to_string(&event)?);
    }

    println!("\n=== Done ===");
    Ok(())
}
