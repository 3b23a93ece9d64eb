//! Spectrogram and 3-D surface commands.

use super::common::{AnalysisArgs, prepare, with_spinner, write_output};
use clap::Args;
use sonograph_analysis::export::{write_grid_csv, write_mesh_csv};
use sonograph_analysis::{sfft3d, spectrogram, stft_db};
use std::path::Path;
use tracing::info;

/// Spectrogram grid as CSV: frames on rows, bins on columns.
#[derive(Args)]
pub struct SpectrogramArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Windowed magnitude in dB instead of the detrended power spectral density
    #[arg(long)]
    pub magnitude: bool,
}

/// Surface mesh as long-form CSV.
#[derive(Args)]
pub struct SurfaceArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Run the spectrogram command.
pub fn run(args: SpectrogramArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let request = job.request;
    let signal = job.signal();
    let sample_rate = job.buffer.sample_rate();

    let grid = with_spinner("Computing spectrogram", || {
        if args.magnitude {
            stft_db(&signal, sample_rate, request.stft, request.band)
        } else {
            spectrogram(&signal, sample_rate, request.stft, request.band)
        }
    })?;
    info!(
        frames = grid.num_frames(),
        bins = grid.num_bins(),
        "spectrogram"
    );

    write_output(args.analysis.output.as_deref(), |out| {
        write_grid_csv(out, &grid)
    })
}

/// Run the surface command.
pub fn run_surface(args: SurfaceArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let request = job.request;
    let signal = job.signal();

    let mesh = with_spinner("Computing surface", || {
        sfft3d(&signal, job.buffer.sample_rate(), request.stft, request.band)
    })?;
    info!(bins = mesh.time.len(), "surface");

    write_output(args.analysis.output.as_deref(), |out| {
        write_mesh_csv(out, &mesh)
    })
}
