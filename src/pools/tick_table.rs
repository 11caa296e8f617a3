//! Initialized ticks of one pool.
//!
//! A tick is initialized while at least one position uses it as a bound.
//! The table is an ordered map, so finding the next initialized tick in
//! either direction is a range query.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::domain::{MAX_TICK, MIN_TICK};
use crate::error::{FlashError, Result};
use crate::math::add_delta;

/// Per-tick liquidity and fee-growth bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInfo {
    liquidity_gross: u128,
    liquidity_net: i128,
    fee_growth_outside0: u128,
    fee_growth_outside1: u128,
}

impl TickInfo {
    /// Total liquidity of all positions bounded by this tick.
    #[must_use]
    pub const fn liquidity_gross(&self) -> u128 {
        self.liquidity_gross
    }

    /// Liquidity added to the active range when the price crosses this tick
    /// upwards (subtracted when crossing downwards).
    #[must_use]
    pub const fn liquidity_net(&self) -> i128 {
        self.liquidity_net
    }

    /// Fee growth of `currency0` on the far side of this tick.
    #[must_use]
    pub const fn fee_growth_outside0(&self) -> u128 {
        self.fee_growth_outside0
    }

    /// Fee growth of `currency1` on the far side of this tick.
    #[must_use]
    pub const fn fee_growth_outside1(&self) -> u128 {
        self.fee_growth_outside1
    }
}

/// Upper bound on the gross liquidity referencing a single tick, chosen so
/// that the active liquidity can never overflow even if every usable tick
/// is saturated.
#[must_use]
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let spacing = tick_spacing.max(1);
    let min_tick = (MIN_TICK / spacing) * spacing;
    let max_tick = (MAX_TICK / spacing) * spacing;
    let num_ticks = u128::from(((max_tick - min_tick) / spacing).unsigned_abs()) + 1;
    u128::MAX / num_ticks
}

/// Ordered map of initialized ticks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickTable {
    ticks: BTreeMap<i32, TickInfo>,
}

impl TickTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `tick`, if initialized.
    #[must_use]
    pub fn get(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    /// Returns `true` if `tick` is initialized.
    #[must_use]
    pub fn is_initialized(&self, tick: i32) -> bool {
        self.ticks.contains_key(&tick)
    }

    /// Number of initialized ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns `true` if no tick is initialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Adds `liquidity_delta` to `tick` as the lower (`upper == false`) or
    /// upper bound of a position, returning whether the tick flipped between
    /// initialized and uninitialized.
    ///
    /// A newly initialized tick at or below the current tick assumes all
    /// fee growth so far happened below it.
    ///
    /// # Errors
    ///
    /// - [`FlashError::Overflow`] if gross liquidity exceeds
    ///   `max_liquidity` or the net liquidity leaves `i128`.
    /// - [`FlashError::Underflow`] if gross liquidity would go negative.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        tick: i32,
        current_tick: i32,
        liquidity_delta: i128,
        fee_growth_global0: u128,
        fee_growth_global1: u128,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool> {
        let mut info = self.ticks.get(&tick).copied().unwrap_or_default();
        let gross_before = info.liquidity_gross;
        let gross_after = add_delta(gross_before, liquidity_delta)?;
        if gross_after > max_liquidity {
            return Err(FlashError::Overflow("tick liquidity exceeds per-tick maximum"));
        }
        let flipped = (gross_after == 0) != (gross_before == 0);

        if gross_before == 0 && tick <= current_tick {
            info.fee_growth_outside0 = fee_growth_global0;
            info.fee_growth_outside1 = fee_growth_global1;
        }
        info.liquidity_gross = gross_after;
        info.liquidity_net = if upper {
            info.liquidity_net.checked_sub(liquidity_delta)
        } else {
            info.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(FlashError::Overflow("tick net liquidity exceeds i128"))?;

        self.ticks.insert(tick, info);
        Ok(flipped)
    }

    /// Drops an uninitialized tick.
    pub fn clear(&mut self, tick: i32) {
        self.ticks.remove(&tick);
    }

    /// Crosses `tick`, flipping its fee-growth-outside values against the
    /// given globals, and returns its net liquidity.
    pub fn cross(&mut self, tick: i32, fee_growth_global0: u128, fee_growth_global1: u128) -> i128 {
        match self.ticks.get_mut(&tick) {
            Some(info) => {
                info.fee_growth_outside0 =
                    fee_growth_global0.wrapping_sub(info.fee_growth_outside0);
                info.fee_growth_outside1 =
                    fee_growth_global1.wrapping_sub(info.fee_growth_outside1);
                info.liquidity_net
            }
            None => 0,
        }
    }

    /// Next initialized tick from `tick`: at or below it when `lte`, strictly
    /// above it otherwise. Falls back to the domain bound when none exists.
    #[must_use]
    pub fn next_initialized(&self, tick: i32, lte: bool) -> (i32, bool) {
        let found = if lte {
            self.ticks.range(..=tick).next_back()
        } else {
            self.ticks
                .range((Bound::Excluded(tick), Bound::Unbounded))
                .next()
        };
        match found {
            Some((&t, _)) => (t, true),
            None if lte => (MIN_TICK, false),
            None => (MAX_TICK, false),
        }
    }

    /// Fee growth per unit of liquidity accumulated inside
    /// `[tick_lower, tick_upper)`.
    #[must_use]
    pub fn fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        current_tick: i32,
        fee_growth_global0: u128,
        fee_growth_global1: u128,
    ) -> (u128, u128) {
        let lower = self.ticks.get(&tick_lower).copied().unwrap_or_default();
        let upper = self.ticks.get(&tick_upper).copied().unwrap_or_default();

        let inside = |global: u128, lower_outside: u128, upper_outside: u128| {
            let below = if current_tick >= tick_lower {
                lower_outside
            } else {
                global.wrapping_sub(lower_outside)
            };
            let above = if current_tick < tick_upper {
                upper_outside
            } else {
                global.wrapping_sub(upper_outside)
            };
            global.wrapping_sub(below).wrapping_sub(above)
        };

        (
            inside(
                fee_growth_global0,
                lower.fee_growth_outside0,
                upper.fee_growth_outside0,
            ),
            inside(
                fee_growth_global1,
                lower.fee_growth_outside1,
                upper.fee_growth_outside1,
            ),
        )
    }
}
