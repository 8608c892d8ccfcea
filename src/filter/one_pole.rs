//! One-pole lowpass used for damping and bandwidth control.

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f32::consts::PI;

/// Single-pole IIR lowpass: `y[n] = a0 * x[n] + b1 * y[n-1]`.
///
/// Configured either from a normalized cutoff frequency or directly from
/// the feedback gain `b1` in `[0, 1)`.
#[derive(Debug, Default, Clone)]
pub struct OnePoleLowpass {
    a0: f32,
    b1: f32,
    z1: f32,
}

impl OnePoleLowpass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pole from a cutoff normalized to the sample rate.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.b1 = (-2.0 * PI * cutoff).exp();
        self.a0 = 1.0 - self.b1;
    }

    pub fn set_feedback_gain(&mut self, gain: f32) {
        self.b1 = gain;
        self.a0 = 1.0 - self.b1;
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.z1 = sample * self.a0 + self.z1 * self.b1;
        self.z1
    }
}
