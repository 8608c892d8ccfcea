//! Feedback comb filter with optional damping in the loop.

use crate::filter::one_pole::OnePoleLowpass;
use crate::utils::delay_line::FractionalDelayLine;

/// Feedback comb over a fractional delay line.
///
/// The delayed sample is optionally run through a one-pole lowpass before
/// it re-enters the loop, rolling off highs faster than lows the way air
/// absorption does. The feedback gain is usually derived from a target
/// decay time via [`crate::utils::gain_from_reverb_time`].
#[derive(Debug)]
pub struct CombFilter<const N: usize> {
    gain: f32,
    delay_index: f32,
    sample_rate_hz: f32,
    delay: FractionalDelayLine<N>,
    damping_enabled: bool,
    damping_filter: OnePoleLowpass,
}

impl<const N: usize> Default for CombFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CombFilter<N> {
    pub fn new() -> Self {
        let mut damping_filter = OnePoleLowpass::new();
        damping_filter.set_feedback_gain(0.5);

        Self {
            gain: 0.0,
            delay_index: 0.0,
            sample_rate_hz: 0.0,
            delay: FractionalDelayLine::new(),
            damping_enabled: true,
            damping_filter,
        }
    }

    pub fn prepare(&mut self, sample_rate_hz: f32, delay_ms: f32) {
        self.sample_rate_hz = sample_rate_hz;
        self.delay.clear();
        self.damping_filter.reset();
        self.set_delay_ms(delay_ms);
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn set_delay_ms(&mut self, delay_ms: f32) {
        self.delay_index = delay_ms * self.sample_rate_hz / 1000.0;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping_filter.set_feedback_gain(damping);
    }

    pub fn set_damping_enabled(&mut self, enabled: bool) {
        self.damping_enabled = enabled;
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let mut delayed = self.delay.read(self.delay_index);
        if self.damping_enabled {
            delayed = self.damping_filter.process(delayed);
        }
        self.delay.push(sample + self.gain * delayed);

        delayed
    }
}
