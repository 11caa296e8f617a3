//! Exact conversions between ticks and Q64.64 sqrt prices.
//!
//! `sqrt_price_at_tick(t) = ceil(sqrt(1.0001^t) * 2^64)`. The ratio is built
//! in Q128.128 from one precomputed factor per bit of `|t|`, each factor being
//! `sqrt(1.0001^-(2^i))` in Q128.128. Positive ticks invert the ratio, and the
//! result is shifted down to Q64.64 rounding up, so the mapping is strictly
//! monotonic and deterministic across platforms.
//!
//! [`tick_at_sqrt_price`] returns the greatest tick whose sqrt price does not
//! exceed its argument, found by binary search over the tick domain.
//!
//! # Examples
//!
//! ```
//! use hydra_flash::domain::{SqrtPrice, Tick};
//! use hydra_flash::math::{sqrt_price_at_tick, tick_at_sqrt_price};
//!
//! let price = sqrt_price_at_tick(Tick::ZERO);
//! assert_eq!(price, SqrtPrice::ONE);
//! assert_eq!(tick_at_sqrt_price(price), Ok(Tick::ZERO));
//! ```

use ethnum::U256;

use crate::domain::{SqrtPrice, Tick, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};
use crate::error::{FlashError, Result};

/// Factor for bit 0 of `|tick|`.
const RATIO_BIT_0: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// Factors for bits 1..=18 of `|tick|` (bit 18 suffices for `|tick| <= 443636`).
const RATIO_FACTORS: [(u32, u128); 18] = [
    (0x2, 0xfff9_7272_373d_4132_59a4_6990_580e_213a),
    (0x4, 0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc),
    (0x8, 0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0),
    (0x10, 0xffcb_9843_d60f_6159_c9db_5883_5c92_6644),
    (0x20, 0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0),
    (0x40, 0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861),
    (0x80, 0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053),
    (0x100, 0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4),
    (0x200, 0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54),
    (0x400, 0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3),
    (0x800, 0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9),
    (0x1000, 0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825),
    (0x2000, 0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5),
    (0x4000, 0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7),
    (0x8000, 0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6),
    (0x10000, 0x9aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9),
    (0x20000, 0x5d_6af8_dedb_8119_6699_c329_225e_e604),
    (0x40000, 0x2216_e584_f5fa_1ea9_2604_1bed_fe98),
];

/// Sqrt price at `tick`.
///
/// Always lies in `[SqrtPrice::MIN, SqrtPrice::MAX]` because [`Tick`] is
/// range-checked at construction.
#[must_use]
pub fn sqrt_price_at_tick(tick: Tick) -> SqrtPrice {
    SqrtPrice::from_raw(raw_sqrt_price_at_tick(tick.get()))
}

/// Raw Q64.64 sqrt price for an index already known to be in range.
pub(crate) fn raw_sqrt_price_at_tick(tick: i32) -> u128 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(RATIO_BIT_0)
    } else {
        U256::ONE << 128
    };
    for (bit, factor) in RATIO_FACTORS {
        if abs_tick & bit != 0 {
            // ratio <= 2^128 and factor < 2^128, so the product fits.
            ratio = (ratio * U256::from(factor)) >> 128;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.64, rounding up.
    let low_mask = (U256::ONE << 64) - U256::ONE;
    let round = if ratio & low_mask == U256::ZERO {
        U256::ZERO
    } else {
        U256::ONE
    };
    U256::as_u128((ratio >> 64) + round)
}

/// Greatest tick whose sqrt price is `<= sqrt_price`.
///
/// # Errors
///
/// Returns [`FlashError::InvalidPrice`] outside `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`.
pub fn tick_at_sqrt_price(sqrt_price: SqrtPrice) -> Result<Tick> {
    let target = sqrt_price.get();
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&target) {
        return Err(FlashError::InvalidPrice("sqrt price outside tick domain"));
    }

    let (mut lo, mut hi) = (MIN_TICK, MAX_TICK);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if raw_sqrt_price_at_tick(mid) <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Tick::new(lo)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Q64;

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick expected");
        };
        t
    }

    fn price(raw: u128) -> SqrtPrice {
        let Ok(p) = SqrtPrice::new(raw) else {
            panic!("valid price expected");
        };
        p
    }

    // -- sqrt_price_at_tick -------------------------------------------------

    #[test]
    fn tick_zero_is_one() {
        assert_eq!(sqrt_price_at_tick(Tick::ZERO).get(), Q64);
    }

    #[test]
    fn bounds_match_constants() {
        assert_eq!(sqrt_price_at_tick(Tick::MIN).get(), MIN_SQRT_PRICE);
        assert_eq!(sqrt_price_at_tick(Tick::MAX).get(), MAX_SQRT_PRICE);
    }

    #[test]
    fn known_values() {
        let cases: [(i32, u128); 8] = [
            (1, 18_447_666_387_855_959_851),
            (-1, 18_445_821_805_675_392_312),
            (60, 18_502_164_624_211_761_448),
            (-60, 18_391_489_527_427_947_883),
            (6_931, 26_086_568_254_500_584_002),
            (-6_932, 13_043_699_376_587_823_078),
            (100_000, 2_737_055_259_406_582_257_881),
            (-100_000, 124_324_258_982_887_575),
        ];
        for (t, expected) in cases {
            assert_eq!(sqrt_price_at_tick(tick(t)).get(), expected, "tick {t}");
        }
    }

    #[test]
    fn strictly_increasing() {
        let ticks = [MIN_TICK, -200_000, -60, -1, 0, 1, 60, 200_000, MAX_TICK];
        for pair in ticks.windows(2) {
            let [a, b] = pair else {
                panic!("windows(2) yields pairs");
            };
            assert!(sqrt_price_at_tick(tick(*a)) < sqrt_price_at_tick(tick(*b)));
        }
    }

    // -- tick_at_sqrt_price -------------------------------------------------

    #[test]
    fn exact_grid_points_round_trip() {
        for t in [MIN_TICK, -100_000, -61, -60, -1, 0, 1, 59, 60, 100_000, MAX_TICK] {
            let p = sqrt_price_at_tick(tick(t));
            assert_eq!(tick_at_sqrt_price(p), Ok(tick(t)), "tick {t}");
        }
    }

    #[test]
    fn between_grid_points_floors() {
        let just_below = price(sqrt_price_at_tick(tick(60)).get() - 1);
        assert_eq!(tick_at_sqrt_price(just_below), Ok(tick(59)));
        assert_eq!(tick_at_sqrt_price(price(Q64 - 1)), Ok(tick(-1)));
    }

    #[test]
    fn sqrt_two_maps_to_price_two_tick() {
        // sqrt(2) in Q64.64; log_1.0001(2) = 6931.47...
        assert_eq!(
            tick_at_sqrt_price(price(26_087_635_650_665_564_424)),
            Ok(tick(6_931))
        );
    }
}
