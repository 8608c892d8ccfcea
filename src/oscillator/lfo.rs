//! Phase-accumulator LFO with sine, triangle and sawtooth shapes.

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Triangle,
    Sine,
    Saw,
}

impl Default for Waveform {
    fn default() -> Self {
        Self::Triangle
    }
}

/// Modulo-1 phase accumulator mapped to a bipolar waveform.
///
/// The phase wraps at the 0/1 boundary in the direction of travel, so a
/// negative frequency runs the waveform backwards.
#[derive(Debug, Default)]
pub struct Lfo {
    waveform: Waveform,
    phase_increment: f32,
    phase: f32,
}

impl Lfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Sets the frequency and restarts the phase at zero.
    pub fn init(&mut self, sample_rate_hz: f32, frequency_hz: f32) {
        self.phase_increment = frequency_hz / sample_rate_hz;
        self.phase = 0.0;
    }

    /// Changes the frequency while preserving the current phase.
    pub fn set_frequency(&mut self, sample_rate_hz: f32, frequency_hz: f32) {
        self.phase_increment = frequency_hz / sample_rate_hz;
    }

    /// Returns the next sample in [-1, 1] and advances the phase.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        let out = match self.waveform {
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Triangle => {
                let bipolar = 2.0 * self.phase - 1.0;
                2.0 * bipolar.abs() - 1.0
            }
            Waveform::Sine => (self.phase * TAU).sin(),
        };

        self.advance();

        out
    }

    #[inline]
    pub fn render(&mut self, out: &mut [f32]) {
        for out_sample in out.iter_mut() {
            *out_sample = self.next();
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.phase_increment;

        if self.phase_increment > 0.0 && self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        if self.phase_increment < 0.0 && self.phase <= 0.0 {
            self.phase += 1.0;
        }
    }
}
