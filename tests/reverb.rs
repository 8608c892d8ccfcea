//! Tests for the reverberation networks


use reverb_dsp::fx::dattoro_reverb::DattoroReverb;
use reverb_dsp::fx::schroeder_reverb::SchroederReverb;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 1024;

/// Deterministic white noise from a simple LCG.
fn white_noise(len: usize) -> Vec<f32> {
    let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as i32) as f32 / (i32::MAX as f32)
        })
        .collect()
}

fn energy(samples: &[f32]) -> f32 {
    samples.iter().map(|x| x * x).sum()
}

#[test]
fn dattoro_impulse_energy_decays() {
    const BLOCKS: usize = 128;
    // Group blocks into windows spanning roughly one tank round trip so
    // the echo pattern inside a pass does not mask the decay.
    const WINDOW: usize = 16;

    let mut reverb = DattoroReverb::new();
    reverb.prepare(SAMPLE_RATE);
    reverb.set_decay(0.5);

    let mut input = [0.0; BLOCK_SIZE];
    let mut output = [0.0; BLOCK_SIZE];
    let mut rendered = Vec::new();

    for n in 0..BLOCKS {
        input.fill(0.0);
        if n == 0 {
            input[0] = 1.0;
        }
        reverb.process(&input, &mut output, 1, BLOCK_SIZE);
        rendered.extend_from_slice(&output);
    }

    for sample in &rendered {
        assert!(sample.is_finite());
        assert!(sample.abs() <= 1.0);
    }

    let windows: Vec<f32> = rendered
        .chunks(WINDOW * BLOCK_SIZE)
        .map(energy)
        .collect();
    let peak = windows
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();

    for pair in windows[peak..].windows(2) {
        assert!(pair[1] < pair[0]);
    }
    assert!(*windows.last().unwrap() < windows[peak] * 1e-3);
}

#[test]
fn dattoro_predelay_defers_onset() {
    let mut reverb = DattoroReverb::new();
    reverb.prepare(SAMPLE_RATE);
    reverb.set_diffuser_enabled(false);
    reverb.set_tank_enabled(false);
    reverb.set_predelay(0.5); // 500 of the 1000-sample maximum

    let mut input = [0.0; BLOCK_SIZE];
    let mut output = [0.0; BLOCK_SIZE];
    input[0] = 1.0;
    reverb.process(&input, &mut output, 1, BLOCK_SIZE);

    // Nothing may leak out before the predelay has elapsed; the impulse
    // then surfaces through the bandwidth one-pole (a0 = 0.5).
    for sample in &output[..501] {
        assert_eq!(*sample, 0.0);
    }
    assert!((output[501] - 0.5).abs() < 1e-6);
}

#[test]
fn dattoro_planar_matches_interleaved() {
    const FRAMES: usize = 4096;

    let mut interleaved_reverb = DattoroReverb::new();
    interleaved_reverb.prepare(SAMPLE_RATE);
    let mut planar_reverb = DattoroReverb::new();
    planar_reverb.prepare(SAMPLE_RATE);

    let noise = white_noise(FRAMES * 2);
    let mut interleaved_out = vec![0.0; FRAMES * 2];
    interleaved_reverb.process(&noise, &mut interleaved_out, 2, FRAMES);

    let mut left: Vec<f32> = noise.iter().step_by(2).copied().collect();
    let mut right: Vec<f32> = noise.iter().skip(1).step_by(2).copied().collect();
    {
        let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
        planar_reverb.process_planar(&mut channels, FRAMES);
    }

    for frame in 0..FRAMES {
        assert_eq!(left[frame], interleaved_out[frame * 2]);
        assert_eq!(right[frame], interleaved_out[frame * 2 + 1]);
    }
    // The tank taps differ per side.
    assert!(left.iter().zip(right.iter()).any(|(l, r)| l != r));
}

#[test]
fn schroeder_dry_mix_bypasses_exactly() {
    const FRAMES: usize = 2048;

    let mut reverb = SchroederReverb::new();
    reverb.prepare(SAMPLE_RATE, 1500.0);
    reverb.set_dry_wet_mix(0.0);

    let input = white_noise(FRAMES);
    let mut output = vec![0.0; FRAMES];
    reverb.process(&input, &mut output, 1, FRAMES);

    for frame in 0..FRAMES {
        assert_eq!(output[frame], input[frame]);
    }
}

#[test]
fn schroeder_reverb_time_scales_tail() {
    let render_tail = |rt60_ms: f32| -> f32 {
        let mut reverb = SchroederReverb::new();
        reverb.prepare(SAMPLE_RATE, rt60_ms);
        reverb.set_dry_wet_mix(1.0);

        let mut input = [0.0; BLOCK_SIZE];
        let mut output = [0.0; BLOCK_SIZE];
        let mut rendered = Vec::new();
        for n in 0..48 {
            input.fill(0.0);
            if n == 0 {
                input[0] = 1.0;
            }
            reverb.process(&input, &mut output, 1, BLOCK_SIZE);
            rendered.extend_from_slice(&output);
        }

        // Energy between 0.5 s and 1.0 s.
        energy(&rendered[24000..48000])
    };

    let short = render_tail(500.0);
    let long = render_tail(2000.0);
    assert!(long > short * 10.0);
}

#[test]
fn schroeder_update_reverb_time_takes_effect() {
    let mut reverb = SchroederReverb::new();
    reverb.prepare(SAMPLE_RATE, 2000.0);
    reverb.set_dry_wet_mix(1.0);
    reverb.update_reverb_time(200.0);

    let mut input = [0.0; BLOCK_SIZE];
    let mut output = [0.0; BLOCK_SIZE];
    let mut rendered = Vec::new();
    for n in 0..48 {
        input.fill(0.0);
        if n == 0 {
            input[0] = 1.0;
        }
        reverb.process(&input, &mut output, 1, BLOCK_SIZE);
        rendered.extend_from_slice(&output);
    }

    // With a 200 ms target the tail is long gone after half a second.
    let late = energy(&rendered[24000..]);
    let early = energy(&rendered[..24000]);
    assert!(late < early * 1e-4);
}

#[test]
fn schroeder_planar_matches_interleaved() {
    const FRAMES: usize = 4096;

    let mut interleaved_reverb = SchroederReverb::new();
    interleaved_reverb.prepare(SAMPLE_RATE, 1500.0);
    let mut planar_reverb = SchroederReverb::new();
    planar_reverb.prepare(SAMPLE_RATE, 1500.0);

    let noise = white_noise(FRAMES * 2);
    let mut interleaved_out = vec![0.0; FRAMES * 2];
    interleaved_reverb.process(&noise, &mut interleaved_out, 2, FRAMES);

    let mut left: Vec<f32> = noise.iter().step_by(2).copied().collect();
    let mut right: Vec<f32> = noise.iter().skip(1).step_by(2).copied().collect();
    {
        let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
        planar_reverb.process_planar(&mut channels, FRAMES);
    }

    for frame in 0..FRAMES {
        assert_eq!(left[frame], interleaved_out[frame * 2]);
        assert_eq!(right[frame], interleaved_out[frame * 2 + 1]);
    }
}

#[test]
fn schroeder_wet_path_is_clipped() {
    const FRAMES: usize = 8192;

    let mut reverb = SchroederReverb::new();
    reverb.prepare(SAMPLE_RATE, 4000.0);
    reverb.set_dry_wet_mix(1.0);

    let mut input = vec![0.0; FRAMES];
    input[0] = 100.0; // drive the comb bank far past full scale

    let mut output = vec![0.0; FRAMES];
    reverb.process(&input, &mut output, 1, FRAMES);

    for sample in &output {
        assert!(sample.abs() <= 1.0);
    }
}

#[test]
fn dattoro_render() {
    let duration = 2.0;

    let mut reverb = DattoroReverb::new();
    reverb.prepare(SAMPLE_RATE);
    reverb.set_decay(0.7);

    let mut input = [0.0; BLOCK_SIZE];
    let mut output = [0.0; BLOCK_SIZE * 2];
    let mut wav_data_left = Vec::new();
    let mut wav_data_right = Vec::new();

    let blocks = (duration * SAMPLE_RATE / (BLOCK_SIZE as f32)) as usize;

    for n in 0..blocks {
        input.fill(0.0);
        if n == 0 {
            input[0] = 1.0;
        }
        let stereo: Vec<f32> = input.iter().flat_map(|&x| [x, x]).collect();
        reverb.process(&stereo, &mut output, 2, BLOCK_SIZE);
        wav_data_left.extend(output.iter().step_by(2));
        wav_data_right.extend(output.iter().skip(1).step_by(2));
    }

    wav_writer::write_stereo(
        "fx/dattoro_reverb.wav",
        SAMPLE_RATE as u32,
        &wav_data_left,
        &wav_data_right,
    )
    .ok();
}

#[test]
fn schroeder_render() {
    let duration = 2.0;

    let mut reverb = SchroederReverb::new();
    reverb.prepare(SAMPLE_RATE, 1800.0);
    reverb.set_dry_wet_mix(1.0);

    let mut in_out = [0.0; BLOCK_SIZE];
    let mut wav_data = Vec::new();

    let blocks = (duration * SAMPLE_RATE / (BLOCK_SIZE as f32)) as usize;

    for n in 0..blocks {
        in_out.fill(0.0);
        if n == 0 {
            in_out[0] = 1.0;
        }
        let input = in_out;
        reverb.process(&input, &mut in_out, 1, BLOCK_SIZE);
        wav_data.extend_from_slice(&in_out);
    }

    wav_writer::write("fx/schroeder_reverb.wav", SAMPLE_RATE as u32, &wav_data).ok();
}
