//! Magnitude spectrum command.

use super::common::{AnalysisArgs, prepare, with_spinner, write_output};
use clap::Args;
use sonograph_analysis::basic_spectrum_channels;
use sonograph_analysis::export::write_spectrum_csv;
use std::path::Path;
use tracing::info;

/// Normalized one-sided spectrum as CSV, one column per channel.
#[derive(Args)]
pub struct SpectrumArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Run the spectrum command.
pub fn run(args: SpectrumArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let request = job.request;

    let spectra = with_spinner("Computing spectrum", || {
        basic_spectrum_channels(
            &job.buffer,
            request.channel,
            request.band,
            request.decimation,
        )
    })?;

    if let Some(first) = spectra.magnitudes.first()
        && let Some((bin, _)) = first
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    {
        info!(peak_hz = spectra.frequencies[bin], bins = first.len(), "spectrum");
    }

    let names = job.channel_names();
    write_output(args.analysis.output.as_deref(), |out| {
        write_spectrum_csv(out, &spectra, &names)
    })
}
