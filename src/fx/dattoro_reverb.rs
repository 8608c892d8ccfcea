//! Dattorro-style plate reverb.
//!
//! Predelay and bandwidth filtering feed a four-stage input diffuser and a
//! pair of cross-coupled tank branches. Each branch chains a modulated
//! all-pass, two long delays, a damping lowpass and a fixed all-pass;
//! feeding every branch's retained output back into the other one is what
//! produces the dense, non-repeating plate tail.

use crate::filter::allpass::AllPassFilter;
use crate::filter::one_pole::OnePoleLowpass;
use crate::oscillator::lfo::Lfo;
use crate::utils::delay_line::FractionalDelayLine;
use crate::utils::hard_clip;

const NUM_DIFFUSERS: usize = 4;
const DIFFUSER_GAINS: [f32; NUM_DIFFUSERS] = [0.750, 0.750, 0.625, 0.625];
const DIFFUSER_DELAY_SAMPLES: [f32; NUM_DIFFUSERS] = [210.0, 158.0, 561.0, 410.0];
const DIFFUSER_MAX_DELAY: usize = 1024;

const NUM_TAPS: usize = 7;
const TANK_MOD_ALLPASS_MAX_DELAY: usize = 2048;
const TANK_ALLPASS_MAX_DELAY: usize = 4096;
const TANK_MAX_DELAY: usize = 8192;
const TANK_LFO_FREQUENCY_HZ: f32 = 0.1;

const PREDELAY_MAX_SAMPLES: f32 = 1000.0;
const PREDELAY_CAPACITY: usize = 1024;

/// Four fixed-coefficient all-passes smearing the input transients.
#[derive(Debug, Default)]
struct InputDiffuser {
    allpasses: [AllPassFilter<DIFFUSER_MAX_DELAY>; NUM_DIFFUSERS],
}

impl InputDiffuser {
    fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, sample_rate_hz: f32) {
        for (i, allpass) in self.allpasses.iter_mut().enumerate() {
            allpass.prepare(sample_rate_hz, 0.0);
            allpass.set_delay_samples(DIFFUSER_DELAY_SAMPLES[i]);
            allpass.set_gain(DIFFUSER_GAINS[i]);
        }
    }

    #[inline]
    fn process(&mut self, mut sample: f32) -> f32 {
        for allpass in self.allpasses.iter_mut() {
            sample = allpass.process(sample);
        }
        sample
    }
}

/// Delay lengths, gains and output taps of one tank branch, in samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct TankConfig {
    pub lfo_excursion: f32,
    pub delays: [f32; 2],
    /// Gains of the modulated and the fixed all-pass.
    pub diffusion_gains: [f32; 2],
    /// Delays of the modulated and the fixed all-pass.
    pub diffusion_delays: [f32; 2],
    pub output_taps: [f32; NUM_TAPS],
}

const TANK_CONFIGS: [TankConfig; 2] = [
    TankConfig {
        lfo_excursion: 12.0,
        delays: [6241.0, 4641.0],
        diffusion_gains: [0.70, 0.50],
        diffusion_delays: [1343.0, 3931.0],
        output_taps: [394.0, 4401.0, 2831.0, 2954.0, 3124.0, 496.0, 179.0],
    },
    TankConfig {
        lfo_excursion: 12.0,
        delays: [6590.0, 5505.0],
        diffusion_gains: [0.70, 0.50],
        diffusion_delays: [995.0, 2664.0],
        output_taps: [522.0, 5368.0, 1817.0, 3956.0, 2945.0, 277.0, 1578.0],
    },
];

/// One half of the reverberation tank.
#[derive(Debug)]
struct TankBranch {
    config: TankConfig,
    lfo: Lfo,
    mod_allpass: AllPassFilter<TANK_MOD_ALLPASS_MAX_DELAY>,
    allpass: AllPassFilter<TANK_ALLPASS_MAX_DELAY>,
    delays: [FractionalDelayLine<TANK_MAX_DELAY>; 2],
    damping_filter: OnePoleLowpass,
    damping: f32,
    taps: [f32; NUM_TAPS],
    state: f32,
}

impl Default for TankBranch {
    fn default() -> Self {
        Self::new()
    }
}

impl TankBranch {
    fn new() -> Self {
        Self {
            config: TankConfig::default(),
            lfo: Lfo::new(),
            mod_allpass: AllPassFilter::new(),
            allpass: AllPassFilter::new(),
            delays: [FractionalDelayLine::new(), FractionalDelayLine::new()],
            damping_filter: OnePoleLowpass::new(),
            damping: 0.5,
            taps: [0.0; NUM_TAPS],
            state: 0.0,
        }
    }

    fn prepare(&mut self, sample_rate_hz: f32, config: TankConfig) {
        self.config = config;

        for delay in self.delays.iter_mut() {
            delay.clear();
        }

        self.lfo.init(sample_rate_hz, TANK_LFO_FREQUENCY_HZ);

        self.mod_allpass.prepare(sample_rate_hz, 0.0);
        self.mod_allpass.set_delay_samples(config.diffusion_delays[0]);
        self.mod_allpass.set_gain(config.diffusion_gains[0]);

        self.damping_filter.reset();
        self.damping_filter.set_feedback_gain(self.damping);

        self.allpass.prepare(sample_rate_hz, 0.0);
        self.allpass.set_delay_samples(config.diffusion_delays[1]);
        self.allpass.set_gain(config.diffusion_gains[1]);

        self.taps = [0.0; NUM_TAPS];
        self.state = 0.0;
    }

    fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
        self.damping_filter.set_feedback_gain(damping);
    }

    #[inline]
    fn process(&mut self, sample: f32) {
        let lfo_value = self.lfo.next();
        let mod_delay = self.config.diffusion_delays[0] + lfo_value * self.config.lfo_excursion;

        self.mod_allpass.set_delay_samples(mod_delay);
        let mut sample = self.mod_allpass.process(sample);

        let mut delayed = self.delays[0].read(self.config.delays[0]);
        self.delays[0].push(sample);
        self.taps[0] = self.delays[0].read(self.config.output_taps[0]);
        self.taps[1] = self.delays[0].read(self.config.output_taps[1]);
        self.taps[4] = self.delays[0].read(self.config.output_taps[4]);

        sample = self.damping_filter.process(delayed);

        sample = self.allpass.process(sample);
        self.taps[2] = self.allpass.tap(self.config.output_taps[2]);
        self.taps[5] = self.allpass.tap(self.config.output_taps[5]);

        delayed = self.delays[1].read(self.config.delays[1]);
        self.delays[1].push(sample);
        self.taps[3] = self.delays[1].read(self.config.output_taps[3]);
        self.taps[6] = self.delays[1].read(self.config.output_taps[6]);

        // Fed back into the other branch on the next sample.
        self.state = delayed;
    }
}

/// Stereo plate reverb.
///
/// `prepare()` must run once before processing. The diffuser and tank
/// stages can be bypassed independently for A/B comparison.
#[derive(Debug)]
pub struct DattoroReverb {
    diffuser: InputDiffuser,
    tanks: [TankBranch; 2],
    predelay: FractionalDelayLine<PREDELAY_CAPACITY>,
    predelay_fraction: f32,
    bandwidth_filter: OnePoleLowpass,
    decay: f32,
    diffuser_enabled: bool,
    tank_enabled: bool,
}

impl Default for DattoroReverb {
    fn default() -> Self {
        Self::new()
    }
}

impl DattoroReverb {
    pub fn new() -> Self {
        let mut bandwidth_filter = OnePoleLowpass::new();
        bandwidth_filter.set_feedback_gain(0.5);

        Self {
            diffuser: InputDiffuser::new(),
            tanks: [TankBranch::new(), TankBranch::new()],
            predelay: FractionalDelayLine::new(),
            predelay_fraction: 0.5,
            bandwidth_filter,
            decay: 0.5,
            diffuser_enabled: true,
            tank_enabled: true,
        }
    }

    pub fn prepare(&mut self, sample_rate_hz: f32) {
        self.predelay.clear();
        self.bandwidth_filter.reset();
        self.diffuser.prepare(sample_rate_hz);
        self.tanks[0].prepare(sample_rate_hz, TANK_CONFIGS[0]);
        self.tanks[1].prepare(sample_rate_hz, TANK_CONFIGS[1]);
    }

    /// Feedback scaling between the two tank branches, below 1 for a
    /// bounded tail.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay;
    }

    pub fn set_damping(&mut self, damping: f32) {
        for tank in self.tanks.iter_mut() {
            tank.set_damping(damping);
        }
    }

    pub fn set_bandwidth(&mut self, bandwidth: f32) {
        self.bandwidth_filter.set_feedback_gain(bandwidth);
    }

    /// Predelay as a fraction of the fixed 1000-sample maximum.
    pub fn set_predelay(&mut self, fraction: f32) {
        self.predelay_fraction = fraction;
    }

    pub fn set_diffuser_enabled(&mut self, enabled: bool) {
        self.diffuser_enabled = enabled;
    }

    pub fn set_tank_enabled(&mut self, enabled: bool) {
        self.tank_enabled = enabled;
    }

    /// Processes interleaved frames; channel 0 receives the left tank mix,
    /// channel 1 the right one, mono buffers their average.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], channels: usize, frames: usize) {
        for frame in 0..frames {
            let offset = frame * channels;

            let mut sample = 0.0;
            for channel in 0..channels {
                sample += input[offset + channel];
            }
            sample /= channels as f32;

            let (left, right) = self.tick(sample);

            if channels == 1 {
                output[offset] = hard_clip((left + right) * 0.5);
            } else {
                for channel in 0..channels {
                    let out = match channel {
                        0 => left,
                        1 => right,
                        _ => (left + right) * 0.5,
                    };
                    output[offset + channel] = hard_clip(out);
                }
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

            let (left, right) = self.tick(sample);

            if channels == 1 {
                signal[0][frame] = hard_clip((left + right) * 0.5);
            } else {
                for (i, channel) in signal.iter_mut().enumerate() {
                    let out = match i {
                        0 => left,
                        1 => right,
                        _ => (left + right) * 0.5,
                    };
                    channel[frame] = hard_clip(out);
                }
            }
        }
    }

    #[inline]
    fn tick(&mut self, sample: f32) -> (f32, f32) {
        let delayed = self
            .predelay
            .read(PREDELAY_MAX_SAMPLES * self.predelay_fraction);
        self.predelay.push(sample);

        let mut sample = self.bandwidth_filter.process(delayed);

        if self.diffuser_enabled {
            sample = self.diffuser.process(sample);
        }

        if !self.tank_enabled {
            return (sample, sample);
        }

        let tank0_input = sample + self.tanks[1].state * self.decay;
        let tank1_input = sample + self.tanks[0].state * self.decay;
        self.tanks[0].process(tank0_input);
        self.tanks[1].process(tank1_input);

        conform_output(&self.tanks[0].taps, &self.tanks[1].taps)
    }
}

/// Folds the seven taps of each branch into a weighted stereo pair.
#[inline]
fn conform_output(tank0: &[f32; NUM_TAPS], tank1: &[f32; NUM_TAPS]) -> (f32, f32) {
    let left = tank0[0] + tank0[1] - tank0[2] + tank0[3] - tank1[4] - tank1[5] - tank1[6];
    let right = tank1[0] + tank1[1] - tank1[2] + tank1[3] - tank0[4] - tank0[5] - tank0[6];

    (left * 0.6, right * 0.6)
}
