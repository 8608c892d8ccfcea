//! Schroeder all-pass section over a fractional delay line.

use crate::utils::delay_line::FractionalDelayLine;

/// First-order all-pass filter with a modulatable delay.
///
/// Unity magnitude response for any gain `|g| < 1`; only phase is altered,
/// which makes chains of these the standard diffusion stage in reverb
/// networks. The delay can be retargeted every sample through
/// `set_delay_samples()` for chorused topologies.
#[derive(Debug)]
pub struct AllPassFilter<const N: usize> {
    gain: f32,
    delay_index: f32,
    sample_rate_hz: f32,
    delay: FractionalDelayLine<N>,
}

impl<const N: usize> Default for AllPassFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AllPassFilter<N> {
    pub fn new() -> Self {
        Self {
            gain: 0.0,
            delay_index: 0.0,
            sample_rate_hz: 0.0,
            delay: FractionalDelayLine::new(),
        }
    }

    /// Clears the line and fixes the millisecond-to-sample conversion.
    pub fn prepare(&mut self, sample_rate_hz: f32, delay_ms: f32) {
        self.sample_rate_hz = sample_rate_hz;
        self.delay.clear();
        self.set_delay_ms(delay_ms);
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn set_delay_ms(&mut self, delay_ms: f32) {
        self.delay_index = delay_ms * self.sample_rate_hz / 1000.0;
    }

    #[inline]
    pub fn set_delay_samples(&mut self, delay_samples: f32) {
        self.delay_index = delay_samples;
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let delayed = self.delay.read(self.delay_index);
        let feedback = sample + self.gain * delayed;
        self.delay.push(feedback);

        delayed - self.gain * feedback
    }

    /// Reads a secondary tap without disturbing the write sequence.
    #[inline]
    pub fn tap(&self, delay_samples: f32) -> f32 {
        self.delay.read(delay_samples)
    }
}
