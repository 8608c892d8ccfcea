//! Buffers and helper functions shared by the filter and effect modules.

pub mod delay_line;
pub mod ring_buffer;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Feedback gain that decays a loop of `delay_ms` to -60 dB in `rt60_ms`.
#[inline]
pub fn gain_from_reverb_time(rt60_ms: f32, delay_ms: f32) -> f32 {
    10.0_f32.powf(-3.0 * delay_ms / rt60_ms)
}

#[inline]
pub fn hard_clip(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

#[inline]
pub fn db_to_gain(decibels: f64) -> f64 {
    const MINIMUM_LEVEL_DB: f64 = -100.0;

    if decibels > MINIMUM_LEVEL_DB {
        10.0_f64.powf(decibels / 20.0)
    } else {
        0.0
    }
}

#[inline]
pub fn gain_to_db(gain: f64) -> f64 {
    const MINIMUM_LEVEL_DB: f64 = -100.0;

    if gain > 0.0 {
        (gain.log10() * 20.0).max(MINIMUM_LEVEL_DB)
    } else {
        MINIMUM_LEVEL_DB
    }
}
