//! Test signal generation command.

use clap::{Args, Subcommand};
use sonograph_analysis::AudioBuffer;
use sonograph_io::write_wav;
use std::f64::consts::TAU;
use std::path::PathBuf;

/// Output format shared by every generator.
#[derive(Args)]
struct WavOptions {
    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    duration: f64,

    /// Bit depth: 16, 24 or 32 (float)
    #[arg(long, default_value = "32")]
    bits: u16,
}

impl WavOptions {
    fn num_samples(&self) -> usize {
        (self.duration.max(0.0) * f64::from(self.sample_rate)).round() as usize
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone, optionally stereo or amplitude-modulated
    Sine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f64,

        /// Right-channel frequency in Hz (writes a stereo file)
        #[arg(long)]
        right_freq: Option<f64>,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f64,

        /// Amplitude-modulation rate in Hz
        #[arg(long)]
        am_rate: Option<f64>,

        /// Amplitude-modulation depth (0-1)
        #[arg(long, default_value = "0.5")]
        am_depth: f64,

        #[command(flatten)]
        wav: WavOptions,
    },

    /// Generate a linear sine sweep (chirp)
    Sweep {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Start frequency in Hz
        #[arg(long, default_value = "100.0")]
        start: f64,

        /// End frequency in Hz
        #[arg(long, default_value = "2000.0")]
        end: f64,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f64,

        #[command(flatten)]
        wav: WavOptions,
    },

    /// Generate digital silence
    Silence {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        wav: WavOptions,
    },
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Sine {
            output,
            freq,
            right_freq,
            amplitude,
            am_rate,
            am_depth,
            wav,
        } => {
            let n = wav.num_samples();
            let modulation = am_rate.map(|rate| (rate, am_depth.clamp(0.0, 1.0)));
            let left = tone(freq, amplitude, modulation, wav.sample_rate, n);
            let buffer = match right_freq {
                Some(right) => {
                    let right = tone(right, amplitude, modulation, wav.sample_rate, n);
                    AudioBuffer::stereo(left, right, wav.sample_rate)?
                }
                None => AudioBuffer::mono(left, wav.sample_rate)?,
            };
            write_wav(&output, &buffer, wav.bits)?;

            println!(
                "Generated {} Hz sine ({:.2}s) to {}",
                freq,
                wav.duration,
                output.display()
            );
        }

        GenerateCommand::Sweep {
            output,
            start,
            end,
            amplitude,
            wav,
        } => {
            let samples = chirp(start, end, amplitude, wav.sample_rate, wav.num_samples());
            write_wav(&output, &AudioBuffer::mono(samples, wav.sample_rate)?, wav.bits)?;

            println!(
                "Generated sweep {}-{} Hz ({:.2}s) to {}",
                start,
                end,
                wav.duration,
                output.display()
            );
        }

        GenerateCommand::Silence { output, wav } => {
            let buffer = AudioBuffer::mono(vec![0.0; wav.num_samples()], wav.sample_rate)?;
            write_wav(&output, &buffer, wav.bits)?;

            println!(
                "Generated silence ({:.2}s) to {}",
                wav.duration,
                output.display()
            );
        }
    }

    Ok(())
}

/// Sine with optional `(rate, depth)` amplitude modulation.
///
/// Phase is computed in f64 so long tones stay clean.
fn tone(
    freq: f64,
    amplitude: f64,
    modulation: Option<(f64, f64)>,
    sample_rate: u32,
    n: usize,
) -> Vec<f32> {
    let fs = f64::from(sample_rate);
    (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            let gain = modulation.map_or(1.0, |(rate, depth)| {
                1.0 - depth * 0.5 * (1.0 - (TAU * rate * t).cos())
            });
            (amplitude * gain * (TAU * freq * t).sin()) as f32
        })
        .collect()
}

/// Linear chirp from `start` to `end` Hz over `n` samples.
fn chirp(start: f64, end: f64, amplitude: f64, sample_rate: u32, n: usize) -> Vec<f32> {
    let fs = f64::from(sample_rate);
    let duration = n as f64 / fs;
    let rate = if duration > 0.0 {
        (end - start) / duration
    } else {
        0.0
    };
    (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            (amplitude * (TAU * (start * t + 0.5 * rate * t * t)).sin()) as f32
        })
        .collect()
}
