//! Second-order IIR filter in transposed-canonical form.

use alloc::vec;
use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f64::consts::PI;

use crate::utils::db_to_gain;

/// Frequency response selected for a [`BiquadFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Lowpass,
    Highpass,
    Bandpass,
    LowShelf,
    HighShelf,
}

impl Default for FilterType {
    fn default() -> Self {
        Self::Lowpass
    }
}

/// Full parameter set of a biquad section.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterSettings {
    pub sample_rate_hz: f64,
    pub q_factor: f64,
    pub cutoff_hz: f64,
    pub filter_type: FilterType,
    pub channels: usize,
    /// Shelf gain; ignored by the lowpass/highpass/bandpass responses.
    pub gain_db: f64,
}

/// Normalized transfer-function coefficients (`a0` divided out).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Second-order IIR with per-channel state for interleaved buffers.
///
/// State and coefficients are kept in f64; the shelf derivations in
/// particular lose audible precision in f32 at low cutoffs. Coefficients
/// are recomputed whenever a parameter changes, state is only touched by
/// `process()` and `clear()`.
#[derive(Debug, Default)]
pub struct BiquadFilter {
    settings: FilterSettings,
    coeff: Coefficients,
    z1: Vec<f64>,
    z2: Vec<f64>,
}

impl BiquadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the per-channel state and computes the initial coefficients.
    ///
    /// Must be called before `process()`. Allocates, so keep it out of the
    /// audio callback.
    pub fn setup(&mut self, settings: FilterSettings) {
        self.settings = settings;
        self.z1 = vec![0.0; settings.channels];
        self.z2 = vec![0.0; settings.channels];
        self.update();
    }

    pub fn set_q_factor(&mut self, q_factor: f64) {
        self.settings.q_factor = q_factor;
        self.update();
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        self.settings.filter_type = filter_type;
        self.update();
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f64) {
        self.settings.cutoff_hz = cutoff_hz;
        self.update();
    }

    pub fn set_gain_db(&mut self, gain_db: f64) {
        self.settings.gain_db = gain_db;
        self.update();
    }

    /// Zeroes all channel state without altering the coefficients.
    pub fn clear(&mut self) {
        self.z1.fill(0.0);
        self.z2.fill(0.0);
    }

    /// Filters `frames` interleaved frames of `channels` channels.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], channels: usize, frames: usize) {
        for frame in 0..frames {
            let offset = frame * channels;
            for channel in 0..channels {
                output[offset + channel] = tick(
                    input[offset + channel],
                    &mut self.z1[channel],
                    &mut self.z2[channel],
                    &self.coeff,
                );
            }
        }
    }

    fn update(&mut self) {
        let settings = &self.settings;
        self.coeff = match settings.filter_type {
            FilterType::Lowpass => {
                let k = 1.0 / (PI * settings.cutoff_hz / settings.sample_rate_hz).tan();
                let k_squared = k * k;
                let q_inv = 1.0 / settings.q_factor;
                let norm = 1.0 / (1.0 + k * q_inv + k_squared);
                Coefficients {
                    b0: norm,
                    b1: 2.0 * norm,
                    b2: norm,
                    a1: norm * 2.0 * (1.0 - k_squared),
                    a2: norm * (1.0 - k * q_inv + k_squared),
                }
            }
            FilterType::Highpass => {
                let k = (PI * settings.cutoff_hz / settings.sample_rate_hz).tan();
                let k_squared = k * k;
                let q_inv = 1.0 / settings.q_factor;
                let norm = 1.0 / (1.0 + k * q_inv + k_squared);
                Coefficients {
                    b0: norm,
                    b1: norm * -2.0,
                    b2: norm,
                    a1: norm * 2.0 * (k_squared - 1.0),
                    a2: norm * (1.0 - k * q_inv + k_squared),
                }
            }
            FilterType::Bandpass => {
                let k = 1.0 / (PI * settings.cutoff_hz / settings.sample_rate_hz).tan();
                let k_squared = k * k;
                let q_inv = 1.0 / settings.q_factor;
                let norm = 1.0 / (1.0 + k * q_inv + k_squared);
                Coefficients {
                    b0: norm * k * q_inv,
                    b1: 0.0,
                    b2: -norm * k * q_inv,
                    a1: norm * 2.0 * (1.0 - k_squared),
                    a2: norm * (1.0 - k * q_inv + k_squared),
                }
            }
            // Shelf forms after Zoelzer, DAFX 2nd ed., table 2.3.
            FilterType::LowShelf => {
                let k = (PI * settings.cutoff_hz / settings.sample_rate_hz).tan();
                let k_squared = k * k;
                let v0 = db_to_gain(settings.gain_db);
                let sqrt2 = 2.0_f64.sqrt();
                let a0 = 1.0 + sqrt2 * k + k_squared;
                Coefficients {
                    b0: (1.0 + (2.0 * v0).sqrt() * k + v0 * k_squared) / a0,
                    b1: (2.0 * (v0 * k_squared - 1.0)) / a0,
                    b2: (1.0 - (2.0 * v0).sqrt() * k + v0 * k_squared) / a0,
                    a1: (2.0 * (k_squared - 1.0)) / a0,
                    a2: (1.0 - sqrt2 * k + k_squared) / a0,
                }
            }
            FilterType::HighShelf => {
                let k = (PI * settings.cutoff_hz / settings.sample_rate_hz).tan();
                let k_squared = k * k;
                let v0 = db_to_gain(settings.gain_db);
                let sqrt2 = 2.0_f64.sqrt();
                let a0 = 1.0 + sqrt2 * k + k_squared;
                Coefficients {
                    b0: (v0 + (2.0 * v0).sqrt() * k + k_squared) / a0,
                    b1: (2.0 * (k_squared - v0)) / a0,
                    b2: (v0 - (2.0 * v0).sqrt() * k + k_squared) / a0,
                    a1: (2.0 * (k_squared - 1.0)) / a0,
                    a2: (1.0 - sqrt2 * k + k_squared) / a0,
                }
            }
        };
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coeff
    }
}

#[inline]
fn tick(sample: f32, z1: &mut f64, z2: &mut f64, coeff: &Coefficients) -> f32 {
    let x = sample as f64;
    let out = coeff.b0 * x + *z1;
    *z1 = x * coeff.b1 - coeff.a1 * out + *z2;
    *z2 = x * coeff.b2 - coeff.a2 * out;

    out as f32
}
