//! Schroeder comb/all-pass reverb.
//!
//! A short pre-diffusion all-pass pair feeds a bank of twelve parallel
//! damped combs whose gains derive from a shared RT60 target; the summed
//! bank runs through an eight-stage series all-pass diffuser before the
//! dry/wet blend.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::filter::allpass::AllPassFilter;
use crate::filter::comb::CombFilter;
use crate::utils::{gain_from_reverb_time, hard_clip};

const NUM_COMBS: usize = 12;
const NUM_PRE_ALLPASS: usize = 2;
const NUM_ALLPASS: usize = 8;

const COMB_DELAYS_MS: [f32; NUM_COMBS] = [
    29.7, 30.1, 32.2, 34.6, 37.2, 38.1, 39.7, 40.5, 41.3, 42.6, 43.7, 45.6,
];
const ALLPASS_DELAYS_MS: [f32; NUM_ALLPASS] = [1.0, 1.5, 2.3, 2.9, 3.7, 4.1, 4.7, 5.0];
const PRE_ALLPASS_DELAYS_MS: [f32; NUM_PRE_ALLPASS] = [1.0, 2.0];

const COMB_MAX_DELAY: usize = 4096;
const ALLPASS_MAX_DELAY: usize = 512;

/// Classic comb-bank reverberator.
///
/// `prepare()` fixes the sample rate and the initial RT60 target;
/// `update_reverb_time()` retargets the decay without touching the delay
/// lengths.
#[derive(Debug)]
pub struct SchroederReverb {
    dry_wet_mix: f32,
    combs: [CombFilter<COMB_MAX_DELAY>; NUM_COMBS],
    allpasses: [AllPassFilter<ALLPASS_MAX_DELAY>; NUM_ALLPASS],
    pre_allpasses: [AllPassFilter<ALLPASS_MAX_DELAY>; NUM_PRE_ALLPASS],
}

impl Default for SchroederReverb {
    fn default() -> Self {
        Self::new()
    }
}

impl SchroederReverb {
    pub fn new() -> Self {
        Self {
            dry_wet_mix: 0.5,
            combs: core::array::from_fn(|_| CombFilter::new()),
            allpasses: core::array::from_fn(|_| AllPassFilter::new()),
            pre_allpasses: core::array::from_fn(|_| AllPassFilter::new()),
        }
    }

    pub fn prepare(&mut self, sample_rate_hz: f32, rt60_ms: f32) {
        for (i, comb) in self.combs.iter_mut().enumerate() {
            comb.prepare(sample_rate_hz, COMB_DELAYS_MS[i]);
            comb.set_gain(gain_from_reverb_time(rt60_ms, COMB_DELAYS_MS[i]));
        }

        let diffusion_gain = 2.0_f32.sqrt() / 2.0;

        for (i, allpass) in self.allpasses.iter_mut().enumerate() {
            allpass.prepare(sample_rate_hz, ALLPASS_DELAYS_MS[i]);
            allpass.set_gain(diffusion_gain);
        }

        for (i, allpass) in self.pre_allpasses.iter_mut().enumerate() {
            allpass.prepare(sample_rate_hz, PRE_ALLPASS_DELAYS_MS[i]);
            allpass.set_gain(diffusion_gain);
        }
    }

    /// Retargets every comb gain from a new RT60, keeping delays intact.
    pub fn update_reverb_time(&mut self, rt60_ms: f32) {
        for (i, comb) in self.combs.iter_mut().enumerate() {
            comb.set_gain(gain_from_reverb_time(rt60_ms, COMB_DELAYS_MS[i]));
        }
    }

    pub fn set_damping(&mut self, damping: f32) {
        for comb in self.combs.iter_mut() {
            comb.set_damping(damping);
        }
    }

    /// 0.0 is fully dry, 1.0 fully wet.
    pub fn set_dry_wet_mix(&mut self, dry_wet_mix: f32) {
        self.dry_wet_mix = dry_wet_mix;
    }

    /// Processes interleaved frames; the folded mono result is replicated
    /// to every output channel.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], channels: usize, frames: usize) {
        for frame in 0..frames {
            let offset = frame * channels;

            let mut sample = 0.0;
            for channel in 0..channels {
                sample += input[offset + channel];
            }
            sample /= channels as f32;

            let out = self.tick(sample);

            for channel in 0..channels {
                output[offset + channel] = out;
            }
        }
    }

    /// In-place variant over planar channel buffers, numerically identical
    /// to `process()`.
    pub fn process_planar(&mut self, signal: &mut [&mut [f32]], frames: usize) {
        let channels = signal.len();

        for frame in 0..frames {
            let mut sample = 0.0;
            for channel in signal.iter() {
                sample += channel[frame];
            }
            sample /= channels as f32;

            let out = self.tick(sample);

            for channel in signal.iter_mut() {
                channel[frame] = out;
            }
        }
    }

    #[inline]
    fn tick(&mut self, mut sample: f32) -> f32 {
        let dry = sample;

        for allpass in self.pre_allpasses.iter_mut() {
            sample = allpass.process(sample);
        }

        let mut wet = 0.0;
        for (i, comb) in self.combs.iter_mut().enumerate() {
            let mut comb_out = comb.process(sample);
            if i % 2 == 0 {
                comb_out = -comb_out;
            }
            wet += comb_out;
        }
        wet *= 1.0 / NUM_COMBS as f32;

        for allpass in self.allpasses.iter_mut() {
            wet = allpass.process(wet);
        }

        wet = hard_clip(wet);

        wet * self.dry_wet_mix + dry * (1.0 - self.dry_wet_mix)
    }
}
