//! RMS energy and waveform preview commands.

use super::common::{AnalysisArgs, prepare, write_output};
use clap::Args;
use sonograph_analysis::export::write_series_csv;
use sonograph_analysis::{FrameParams, sliding_rms, waveform_preview};
use std::path::Path;
use tracing::info;

/// Sliding RMS as CSV.
#[derive(Args)]
pub struct RmsArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// RMS frame length in samples (overrides the config)
    #[arg(long)]
    pub frame: Option<usize>,

    /// RMS hop in samples (overrides the config)
    #[arg(long)]
    pub frame_hop: Option<usize>,
}

/// Strided waveform as CSV.
#[derive(Args)]
pub struct WaveformArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Run the rms command.
pub fn run_rms(args: RmsArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let defaults = job.request.rms;
    let params = FrameParams::new(
        args.frame.unwrap_or(defaults.window_len),
        args.frame_hop.unwrap_or(defaults.hop_len),
    );

    let envelope = sliding_rms(&job.signal(), job.buffer.sample_rate(), params)?;
    info!(
        frame = params.window_len,
        hop = params.hop_len,
        frames = envelope.values.len(),
        "rms"
    );

    write_output(args.analysis.output.as_deref(), |out| {
        write_series_csv(out, "rms", &envelope.times, &envelope.values)
    })
}

/// Run the waveform command.
pub fn run_waveform(args: WaveformArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let waveform = waveform_preview(
        &job.signal(),
        job.buffer.sample_rate(),
        job.request.preview_points,
    )?;
    info!(points = waveform.values.len(), "waveform");

    write_output(args.analysis.output.as_deref(), |out| {
        write_series_csv(out, "amplitude", &waveform.times, &waveform.values)
    })
}
