//! Pitch tracking command.

use super::common::{AnalysisArgs, prepare, with_spinner, write_output};
use clap::Args;
use sonograph_analysis::export::write_series_csv;
use std::path::Path;
use tracing::info;

/// Per-frame F0 as CSV (`0` marks unvoiced frames).
#[derive(Args)]
pub struct PitchArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Run the pitch command.
pub fn run(args: PitchArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let estimator = job.request.pitch;
    let signal = job.signal();

    let series = with_spinner("Tracking pitch", || {
        estimator.estimate(&signal, job.buffer.sample_rate())
    })?;

    let output = args.analysis.output.as_deref();
    write_output(output, |out| {
        write_series_csv(out, "f0_hz", &series.times, &series.values)
    })?;

    match series.stats() {
        Some(stats) => {
            info!(
                strategy = estimator.name(),
                mean = stats.mean,
                std_dev = stats.std_dev,
                voiced = stats.count,
                frames = series.len(),
                "pitch"
            );
            if output.is_some() {
                println!(
                    "Mean F0:     {:.1} ± {:.1} Hz ({} of {} frames voiced)",
                    stats.mean,
                    stats.std_dev,
                    stats.count,
                    series.len()
                );
            }
        }
        None => info!(strategy = estimator.name(), frames = series.len(), "no voiced frames"),
    }
    Ok(())
}
