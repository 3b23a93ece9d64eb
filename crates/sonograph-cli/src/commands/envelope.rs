//! Hilbert envelope and instantaneous frequency command.

use super::common::{AnalysisArgs, prepare, with_spinner, write_output};
use clap::Args;
use sonograph_analysis::export::write_series_csv;
use sonograph_analysis::{hilbert_envelope, instantaneous_frequency};
use std::path::Path;
use tracing::info;

/// Hilbert envelope (or instantaneous frequency) as CSV.
///
/// Long inputs are strided down to the preview budget first; the frequency
/// trace is scaled by the strided sample rate.
#[derive(Args)]
pub struct EnvelopeArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Output instantaneous frequency instead of the envelope
    #[arg(long)]
    pub frequency: bool,
}

/// Run the envelope command.
pub fn run(args: EnvelopeArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let signal = job.signal();
    let sample_rate = job.buffer.sample_rate();
    let points = Some(job.request.preview_points);
    let output = args.analysis.output.as_deref();

    if args.frequency {
        let trace = with_spinner("Computing instantaneous frequency", || {
            instantaneous_frequency(&signal, sample_rate, points)
        })?;
        info!(
            points = trace.values.len(),
            effective_sample_rate = trace.effective_sample_rate,
            "instantaneous frequency"
        );
        write_output(output, |out| {
            write_series_csv(out, "frequency_hz", &trace.times, &trace.values)
        })
    } else {
        let envelope = with_spinner("Computing envelope", || {
            hilbert_envelope(&signal, sample_rate, points)
        })?;
        info!(points = envelope.values.len(), "envelope");
        write_output(output, |out| {
            write_series_csv(out, "envelope", &envelope.times, &envelope.values)
        })
    }
}
