use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Rates, accumulators and elapsed time all live in this type so the same
/// inputs replay to the same outputs on every host.
pub type Fixed64 = I32F32;

/// Whole units of a material. Inventories and counters are never negative.
pub type Units = u64;

/// Convert an f64 to Fixed64, saturating at the representable range.
/// NaN maps to zero. Use only at the configuration boundary.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    if v.is_nan() {
        return Fixed64::ZERO;
    }
    Fixed64::saturating_from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in the tick path.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Whole units contained in a non-negative credit (`floor`). Negative
/// values yield zero.
#[inline]
pub fn whole_units(v: Fixed64) -> Units {
    if v <= Fixed64::ZERO {
        0
    } else {
        v.to_num::<i64>() as Units
    }
}

/// Lift a unit count into Fixed64, saturating at `Fixed64::MAX`.
#[inline]
pub fn units_to_fixed64(units: Units) -> Fixed64 {
    Fixed64::saturating_from_num(units)
}

/// Scale `v` by an integer percentage: `v * pct / 100`.
#[inline]
pub fn scale_percent(v: Fixed64, pct: u32) -> Fixed64 {
    v.saturating_mul(Fixed64::saturating_from_num(pct)) / Fixed64::from_num(100)
}

/// Build `num / den` directly from bits, rounding up and saturating at
/// `Fixed64::MAX`. `den` must be non-zero.
///
/// Rates go through here. Rounding up keeps `rate * t` at or above every
/// whole unit the exact rate would reach, so a step that lands on a unit
/// boundary never comes up a hair short.
pub fn ratio(num: u128, den: u128) -> Fixed64 {
    let bits = ((num << Fixed64::FRAC_NBITS) + den - 1) / den;
    Fixed64::from_bits(bits.min(i64::MAX as u128) as i64)
}

/// Clamp an elapsed wall-clock duration (seconds) into a usable step.
/// Negative, NaN and infinite values all become zero.
#[inline]
pub fn sanitize_elapsed(seconds: f64) -> Fixed64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Fixed64::ZERO;
    }
    f64_to_fixed64(seconds)
}
