//! Scalar metrics and full report commands (JSON output).

use super::common::{AnalysisArgs, Job, prepare, with_spinner, write_json};
use clap::Args;
use serde_json::{Value, json};
use sonograph_analysis::{AnalysisReport, MetricsSummary, analyze, compute_metrics};
use std::path::Path;

/// Scalar metrics of the selected channel.
#[derive(Args)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Every view of the selected channel(s) in one JSON document.
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Run the metrics command.
pub fn run(args: MetricsArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let signal = job.signal();

    let summary = with_spinner("Computing metrics", || {
        compute_metrics(&signal, job.buffer.sample_rate(), &job.request)
    })?;

    let mut value = metrics_json(&summary);
    value["file"] = json!(args.analysis.file.display().to_string());
    value["channel"] = json!(job.request.channel.name());
    value["pitch_strategy"] = json!(job.request.pitch.name());
    write_json(args.analysis.output.as_deref(), &value)
}

/// Run the report command.
pub fn run_report(args: ReportArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let job = prepare(&args.analysis, config)?;
    let report = with_spinner("Analyzing", || analyze(&job.buffer, &job.request))?;

    let value = report_json(&job, &report, &args.analysis.file.display().to_string());
    write_json(args.analysis.output.as_deref(), &value)
}

fn metrics_json(summary: &MetricsSummary) -> Value {
    json!({
        "duration_secs": summary.duration_secs,
        "sample_rate": summary.sample_rate,
        "peak": summary.peak,
        "rms": summary.rms,
        "crest_factor": summary.crest_factor,
        "spectral_centroid_hz": summary.spectral_centroid,
        "spectral_rolloff_hz": summary.spectral_rolloff,
        "mean_f0_hz": summary.mean_f0,
    })
}

fn series_json(times: &[f32], values: &[f32]) -> Value {
    json!({ "times": times, "values": values })
}

fn report_json(job: &Job, report: &AnalysisReport, file: &str) -> Value {
    let request = &job.request;
    let channels: Vec<Value> = job
        .channel_names()
        .iter()
        .zip(&report.spectrum.magnitudes)
        .map(|(name, magnitudes)| json!({ "channel": name, "magnitudes": magnitudes }))
        .collect();
    let pitch_stats = report.pitch.stats().map(|s| {
        json!({ "mean": s.mean, "std_dev": s.std_dev, "voiced_frames": s.count })
    });

    json!({
        "file": file,
        "request": {
            "band": [request.band.fmin, request.band.fmax],
            "fft_scale": request.decimation,
            "stft": { "window": request.stft.window_len, "hop": request.stft.hop_len },
            "rms": { "frame": request.rms.window_len, "hop": request.rms.hop_len },
            "pitch_strategy": request.pitch.name(),
            "channel": request.channel.name(),
            "preview_points": request.preview_points,
            "rolloff_percent": request.rolloff_percent,
        },
        "metrics": metrics_json(&report.metrics),
        "waveform": series_json(&report.waveform.times, &report.waveform.values),
        "spectrum": {
            "frequencies": report.spectrum.frequencies,
            "channels": channels,
        },
        "spectrogram": {
            "times": report.spectrogram.times,
            "frequencies": report.spectrogram.frequencies,
            "values_db": report.spectrogram.values,
        },
        "pitch": {
            "times": report.pitch.times,
            "values": report.pitch.values,
            "stats": pitch_stats,
        },
        "envelope": series_json(&report.envelope.times, &report.envelope.values),
        "instantaneous_frequency": {
            "times": report.instantaneous_frequency.times,
            "values": report.instantaneous_frequency.values,
            "effective_sample_rate": report.instantaneous_frequency.effective_sample_rate,
        },
        "rms": series_json(&report.rms.times, &report.rms.values),
    })
}
