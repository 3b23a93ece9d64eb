//! Shared CLI helpers used across the analysis commands.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sonograph_analysis::{AnalysisRequest, AudioBuffer, ChannelSelection};
use sonograph_config::AnalysisConfig;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Input file, output target and the settings every analysis command can override.
///
/// Unset flags fall back to the config file, then to the built-in defaults.
#[derive(Args, Debug)]
pub struct AnalysisArgs {
    /// Input WAV file
    pub file: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Lower edge of the display band in Hz
    #[arg(long)]
    pub fmin: Option<f32>,

    /// Upper edge of the display band in Hz (defaults are clamped to Nyquist)
    #[arg(long)]
    pub fmax: Option<f32>,

    /// Keep every n-th spectrum bin
    #[arg(long, value_name = "N")]
    pub fft_scale: Option<usize>,

    /// STFT window length in samples
    #[arg(long)]
    pub window: Option<usize>,

    /// STFT hop in samples
    #[arg(long)]
    pub hop: Option<usize>,

    /// Channel to analyze: mono, left, right or both
    #[arg(long)]
    pub channel: Option<String>,

    /// Pitch strategy: spectral_peak, autocorrelation or hilbert
    #[arg(long)]
    pub pitch: Option<String>,

    /// Autocorrelation profile: robust or balanced
    #[arg(long)]
    pub profile: Option<String>,

    /// Display budget for waveform, envelope and frequency traces
    #[arg(long, value_name = "N")]
    pub preview_points: Option<usize>,
}

impl AnalysisArgs {
    /// Fold the command-line overrides into `config`.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(fmin) = self.fmin {
            config.band.fmin = fmin;
        }
        if let Some(fmax) = self.fmax {
            config.band.fmax = fmax;
        }
        if let Some(scale) = self.fft_scale {
            config.fft_scale = scale;
        }
        if let Some(window) = self.window {
            config.stft.window = window;
        }
        if let Some(hop) = self.hop {
            config.stft.hop = hop;
        }
        if let Some(channel) = &self.channel {
            config.channel.clone_from(channel);
        }
        if let Some(strategy) = &self.pitch {
            config.pitch.strategy.clone_from(strategy);
        }
        if let Some(profile) = &self.profile {
            config.pitch.profile.clone_from(profile);
        }
        if let Some(points) = self.preview_points {
            config.preview_points = points;
        }
    }
}

/// A loaded file and the request to run against it.
pub struct Job {
    /// Decoded audio.
    pub buffer: AudioBuffer,
    /// Validated, Nyquist-clamped request.
    pub request: AnalysisRequest,
}

impl Job {
    /// Samples the scalar views run on.
    pub fn signal(&self) -> std::borrow::Cow<'_, [f32]> {
        self.buffer.select_one(self.request.channel)
    }

    /// Column names for the channels `request.channel` selects.
    pub fn channel_names(&self) -> Vec<&'static str> {
        match self.request.channel {
            ChannelSelection::Both if self.buffer.is_stereo() => vec!["left", "right"],
            ChannelSelection::Both => vec!["mono"],
            other => vec![other.name()],
        }
    }
}

/// Load the config, apply overrides, load the file and settle the request.
pub fn prepare(args: &AnalysisArgs, config_path: Option<&Path>) -> anyhow::Result<Job> {
    let mut config = AnalysisConfig::load_or_default(config_path)?;
    args.apply(&mut config);
    let request = config.to_request()?;

    let buffer = sonograph_io::load(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let request = clamp_to_nyquist(request, buffer.sample_rate(), args.fmax.is_some());
    request.validate(buffer.sample_rate())?;

    info!(
        file = %args.file.display(),
        sample_rate = buffer.sample_rate(),
        frames = buffer.len(),
        channel = request.channel.name(),
        "prepared analysis"
    );
    Ok(Job { buffer, request })
}

/// Pull default band edges down to Nyquist.
///
/// An explicit `--fmax` is left alone so that an impossible band still
/// fails validation instead of being silently rewritten.
fn clamp_to_nyquist(
    request: AnalysisRequest,
    sample_rate: u32,
    explicit_fmax: bool,
) -> AnalysisRequest {
    let mut clamped = request.clamped_to(sample_rate);
    if explicit_fmax {
        clamped.band = request.band;
    }

    if clamped.band != request.band {
        warn!(
            fmax = request.band.fmax,
            nyquist = clamped.band.fmax,
            "display band clamped to Nyquist"
        );
    }
    if clamped.pitch != request.pitch {
        warn!(
            strategy = request.pitch.name(),
            sample_rate,
            "pitch band clamped to Nyquist"
        );
    }
    clamped
}

/// Run `work` behind a spinner on stderr.
///
/// The spinner hides itself when stderr is not a terminal.
pub fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = work();
    pb.finish_and_clear();
    result
}

/// Write to `path`, or to stdout when `path` is `None`.
pub fn write_output<F>(path: Option<&Path>, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<Box<dyn Write>>) -> std::io::Result<()>,
{
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let mut out = BufWriter::new(sink);
    write(&mut out)?;
    out.flush()?;

    if let Some(path) = path {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Pretty-print `value` as JSON to `path` or stdout.
pub fn write_json(path: Option<&Path>, value: &serde_json::Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    write_output(path, |out| writeln!(out, "{text}"))
}
