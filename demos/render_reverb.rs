//! Offline impulse-response render of both reverberators.
//!
//! Writes `out/dattoro_reverb.wav` and `out/schroeder_reverb.wav`.

use simple_logger::SimpleLogger;

use reverb_dsp::fx::dattoro_reverb::DattoroReverb;
use reverb_dsp::fx::schroeder_reverb::SchroederReverb;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 1024;
const DURATION_S: f32 = 3.0;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    std::fs::create_dir_all("out").unwrap();

    let blocks = (DURATION_S * SAMPLE_RATE / BLOCK_SIZE as f32) as usize;

    log::info!("rendering Dattorro plate impulse response");
    let mut plate = DattoroReverb::new();
    plate.prepare(SAMPLE_RATE);
    plate.set_decay(0.7);
    plate.set_predelay(0.25);

    let mut interleaved_in = vec![0.0f32; BLOCK_SIZE * 2];
    let mut interleaved_out = vec![0.0f32; BLOCK_SIZE * 2];
    let mut plate_frames = Vec::new();

    for n in 0..blocks {
        interleaved_in.fill(0.0);
        if n == 0 {
            interleaved_in[0] = 1.0;
            interleaved_in[1] = 1.0;
        }
        plate.process(&interleaved_in, &mut interleaved_out, 2, BLOCK_SIZE);
        plate_frames.extend_from_slice(&interleaved_out);
    }

    write_wav("out/dattoro_reverb.wav", &plate_frames);

    log::info!("rendering Schroeder impulse response");
    let mut schroeder = SchroederReverb::new();
    schroeder.prepare(SAMPLE_RATE, 1800.0);
    schroeder.set_dry_wet_mix(1.0);

    let mut mono_in = vec![0.0f32; BLOCK_SIZE];
    let mut mono_out = vec![0.0f32; BLOCK_SIZE];
    let mut schroeder_frames = Vec::new();

    for n in 0..blocks {
        mono_in.fill(0.0);
        if n == 0 {
            mono_in[0] = 1.0;
        }
        schroeder.process(&mono_in, &mut mono_out, 1, BLOCK_SIZE);
        for sample in &mono_out {
            schroeder_frames.push(*sample);
            schroeder_frames.push(*sample);
        }
    }

    write_wav("out/schroeder_reverb.wav", &schroeder_frames);

    log::info!("done");
}

/// Writes interleaved stereo frames as a 32-bit float WAV file.
fn write_wav(path: &str, frames: &[f32]) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for sample in frames {
        writer.write_sample(*sample).unwrap();
    }
    writer.finalize().unwrap();
    log::info!("wrote {path}");
}
